//! HTTP surface of Glimpse.
//!
//! Routes:
//! - `GET /posts/{username}[/{last}]`
//! - `GET /stories/{username}[/{last}]`
//! - `GET /health`
//!
//! Every request runs behind a panic boundary: a fault inside a handler becomes
//! a `500 {"Error": "..."}` response and the process keeps serving.
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use glimpse_feed::FeedService;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod error;
mod handlers;

pub use error::{ApiError, FaultBody};

/// Process-wide state, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
}

impl AppState {
    pub fn new(feed: FeedService) -> Self {
        Self {
            feed: Arc::new(feed),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/posts/{username}", get(handlers::posts))
        .route("/posts/{username}/{last}", get(handlers::posts))
        .route("/stories/{username}", get(handlers::stories))
        .route("/stories/{username}/{last}", get(handlers::stories))
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "glimpse.listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("glimpse.stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
    }
}
