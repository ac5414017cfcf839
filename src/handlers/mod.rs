mod health;
mod metrics;
mod posts;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
