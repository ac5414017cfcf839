use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, register_counter, register_gauge};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("blog_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "blog_rate_limited_total",
        "Requests rejected by the write throttle"
    )
    .unwrap();
    pub static ref POST_COUNT: Gauge =
        register_gauge!("blog_posts", "Current number of stored posts").unwrap();
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "blog_rate_limit_clients",
        "Clients currently tracked by the throttle"
    )
    .unwrap();
}
