use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::debug;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::interval;

use crate::metrics::TRACKED_CLIENTS;

// Rate limit entry - tracks requests per client key within one window
struct ClientEntry {
    count: u32,
    window_expires_at: Instant,
}

// Outcome of charging one request against a client's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub count: u32,
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("tracked client limit reached ({0} clients)")]
    CapacityExhausted(usize),
}

// Per-client fixed-window counter. Each key gets an independent budget of
// `limit` requests per `window`; once the window ends the count hard-resets.
pub struct RateLimiter {
    clients: DashMap<String, ClientEntry>,
    limit: u32,
    window: Duration,
    max_clients: usize,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, max_clients: usize) -> Self {
        Self {
            clients: DashMap::new(),
            limit,
            window,
            max_clients,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    // Record one request for `key` and decide whether it fits the budget
    pub fn record_and_check(&self, key: &str) -> Result<Decision, RateLimitError> {
        self.record_and_check_at(key, Instant::now())
    }

    // The entry guard holds the shard write lock for the key, so the
    // reset-or-increment below is atomic per client: no two requests can
    // observe the same pre-increment count.
    fn record_and_check_at(&self, key: &str, now: Instant) -> Result<Decision, RateLimitError> {
        // Soft cap on distinct keys; concurrent first-timers may overshoot
        // by a few, which is fine for a memory guard
        if !self.clients.contains_key(key) && self.clients.len() >= self.max_clients {
            return Err(RateLimitError::CapacityExhausted(self.max_clients));
        }

        // A key's first request in a window is always allowed, even with a
        // zero limit; only follow-ups are charged against the budget
        let mut slot = match self.clients.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(ClientEntry {
                    count: 1,
                    window_expires_at: now + self.window,
                });
                return Ok(Decision {
                    allowed: true,
                    count: 1,
                });
            }
            Entry::Occupied(slot) => slot,
        };
        let entry = slot.get_mut();

        // Window over? Expired entries count as absent: this request starts
        // a fresh window at 1
        if now >= entry.window_expires_at {
            entry.count = 1;
            entry.window_expires_at = now + self.window;
            return Ok(Decision {
                allowed: true,
                count: 1,
            });
        }

        entry.count += 1;
        Ok(Decision {
            allowed: entry.count <= self.limit,
            count: entry.count,
        })
    }

    // Drop entries whose window has already ended, returning how many went
    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(Instant::now())
    }

    fn evict_expired_at(&self, now: Instant) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, entry| now < entry.window_expires_at);
        before.saturating_sub(self.clients.len())
    }
}

// Background sweep so clients that went quiet don't pin memory forever.
// Lazy expiry in record_and_check already keeps the counts correct; this
// just reclaims the map entries.
pub async fn eviction_loop(limiter: &RateLimiter, every: Duration) {
    let mut ticker = interval(every);

    loop {
        ticker.tick().await;

        let evicted = limiter.evict_expired();
        if evicted > 0 {
            debug!("evicted {} expired rate-limit entries", evicted);
        }
        TRACKED_CLIENTS.set(limiter.tracked_clients() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn limiter(limit: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(limit, Duration::from_secs(window_secs), 1024)
    }

    #[test]
    fn first_request_is_allowed() {
        let rl = limiter(3, 60);
        let d = rl.record_and_check("1.2.3.4").unwrap();
        assert!(d.allowed);
        assert_eq!(d.count, 1);
    }

    #[test]
    fn requests_over_limit_are_rejected_for_the_rest_of_the_window() {
        let rl = limiter(3, 60);
        let now = Instant::now();

        for i in 1..=3 {
            let d = rl.record_and_check_at("1.2.3.4", now).unwrap();
            assert!(d.allowed, "request {} should pass", i);
        }
        // 4th and everything after it in the same window is rejected
        for _ in 0..5 {
            let d = rl.record_and_check_at("1.2.3.4", now).unwrap();
            assert!(!d.allowed);
        }
    }

    #[test]
    fn window_expiry_resets_the_count_to_one() {
        let rl = limiter(2, 60);
        let now = Instant::now();

        for _ in 0..5 {
            rl.record_and_check_at("1.2.3.4", now).unwrap();
        }
        assert!(!rl.record_and_check_at("1.2.3.4", now).unwrap().allowed);

        let later = now + Duration::from_secs(61);
        let d = rl.record_and_check_at("1.2.3.4", later).unwrap();
        assert!(d.allowed);
        assert_eq!(d.count, 1);
    }

    #[test]
    fn a_request_exactly_at_expiry_starts_a_new_window() {
        let rl = limiter(1, 60);
        let now = Instant::now();

        rl.record_and_check_at("1.2.3.4", now).unwrap();
        let d = rl
            .record_and_check_at("1.2.3.4", now + Duration::from_secs(60))
            .unwrap();
        assert!(d.allowed);
        assert_eq!(d.count, 1);
    }

    #[test]
    fn distinct_keys_do_not_affect_each_other() {
        let rl = limiter(1, 60);
        let now = Instant::now();

        assert!(rl.record_and_check_at("1.2.3.4", now).unwrap().allowed);
        assert!(!rl.record_and_check_at("1.2.3.4", now).unwrap().allowed);
        assert!(rl.record_and_check_at("5.6.7.8", now).unwrap().allowed);
    }

    #[test]
    fn concurrent_requests_win_exactly_limit_slots() {
        let rl = Arc::new(limiter(10, 60));
        let allowed = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let rl = Arc::clone(&rl);
                let allowed = Arc::clone(&allowed);
                std::thread::spawn(move || {
                    if rl.record_and_check("1.2.3.4").unwrap().allowed {
                        allowed.fetch_add(1, Ordering::Relaxed);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(allowed.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn a_zero_limit_still_admits_a_keys_first_request() {
        let rl = limiter(0, 60);
        let now = Instant::now();

        let d = rl.record_and_check_at("1.2.3.4", now).unwrap();
        assert!(d.allowed);
        assert_eq!(d.count, 1);
        // only follow-ups in the window are rejected
        assert!(!rl.record_and_check_at("1.2.3.4", now).unwrap().allowed);
    }

    #[test]
    fn new_keys_past_the_capacity_cap_error_but_known_keys_still_work() {
        let rl = RateLimiter::new(5, Duration::from_secs(60), 2);
        rl.record_and_check("1.1.1.1").unwrap();
        rl.record_and_check("2.2.2.2").unwrap();

        assert!(rl.record_and_check("3.3.3.3").is_err());
        // existing keys are unaffected by the cap
        assert!(rl.record_and_check("1.1.1.1").unwrap().allowed);
    }

    #[test]
    fn eviction_reclaims_expired_entries_only() {
        let rl = limiter(5, 60);
        let now = Instant::now();

        rl.record_and_check_at("old", now).unwrap();
        rl.record_and_check_at("fresh", now + Duration::from_secs(30))
            .unwrap();
        assert_eq!(rl.tracked_clients(), 2);

        let evicted = rl.evict_expired_at(now + Duration::from_secs(61));
        assert_eq!(evicted, 1);
        assert_eq!(rl.tracked_clients(), 1);
    }
}
