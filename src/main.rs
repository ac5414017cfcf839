use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use blog_server::config::Args;
use blog_server::rate_limit::{RateLimiter, eviction_loop};
use blog_server::state::AppState;
use blog_server::store::PostStore;

#[tokio::main]
async fn main() {
    env_logger::init();

    // parse cli arguments
    let args = Args::parse();

    // creating shared state
    let state = Arc::new(AppState {
        posts: PostStore::new(),
        limiter: RateLimiter::new(
            args.rate_limit,
            Duration::from_secs(args.rate_window),
            args.max_tracked_clients,
        ),
    });

    // spawn the background sweep for expired rate-limit entries
    let sweep_state = Arc::clone(&state);
    let sweep_every = Duration::from_secs(args.sweep_interval);
    tokio::spawn(async move {
        eviction_loop(&sweep_state.limiter, sweep_every).await;
    });

    let app = blog_server::app(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("Blog server running on http://localhost:{}", args.port);
    info!(
        "Write throttle: {} requests per {} seconds per client",
        args.rate_limit, args.rate_window
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
