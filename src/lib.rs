use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use std::sync::Arc;

pub mod client_ip;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod store;
pub mod throttle;

use state::AppState;

// Full route table. The throttle layer sits on the write routes only;
// reads go straight to the handlers.
pub fn app(state: Arc<AppState>) -> Router {
    let writes = Router::new()
        .route("/posts", post(handlers::create_post))
        .route(
            "/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            throttle::throttle,
        ));

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/posts", get(handlers::list_posts))
        .route("/posts/{id}", get(handlers::get_post))
        .merge(writes)
        .with_state(state)
}
