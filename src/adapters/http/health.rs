//! Liveness endpoint.
//!
//! `GET /` answers `200 alive`. It shares no state with the gateway.

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

async fn alive() -> &'static str {
    "alive"
}

/// Creates the liveness router.
pub fn liveness_router() -> Router {
    Router::new()
        .route("/", get(alive))
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves the liveness router until the task is dropped.
pub async fn serve_liveness(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Liveness endpoint listening on {}", listener.local_addr()?);
    axum::serve(listener, liveness_router()).await
}
