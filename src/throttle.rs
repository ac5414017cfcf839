use axum::extract::{ConnectInfo, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::warn;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::client_ip::client_key;
use crate::metrics::RATE_LIMITED_TOTAL;
use crate::state::AppState;

// Gate in front of the write routes. Each client gets a fixed-window budget
// of writes; over budget means 429 and the handler never runs. If the
// limiter itself faults, the request is let through: throttling going dark
// for a while beats denying all traffic.
pub async fn throttle(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(request.headers(), peer);

    match state.limiter.record_and_check(&key) {
        Ok(decision) if !decision.allowed => {
            RATE_LIMITED_TOTAL.inc();
            warn!(
                "client {} over write limit ({} requests this window)",
                key, decision.count
            );
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(
                    header::RETRY_AFTER,
                    state.limiter.window().as_secs().to_string(),
                )],
                "Too many requests",
            )
                .into_response()
        }
        Ok(_) => next.run(request).await,
        Err(err) => {
            // fail open
            warn!("rate limiter fault, letting request through: {}", err);
            next.run(request).await
        }
    }
}
