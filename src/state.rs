use crate::rate_limit::RateLimiter;
use crate::store::PostStore;

// App's shared state
pub struct AppState {
    pub posts: PostStore,
    pub limiter: RateLimiter,
}
