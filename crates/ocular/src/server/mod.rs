//! Axum HTTP server: routes, shared state, bind and shutdown.

mod error;
mod handlers;

pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use ocular_core::{Config, Dispatcher};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body size (uploads are images, not videos).
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Read-only state shared by all in-flight requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/generate", post(handlers::generate))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until ctrl-c.
pub async fn serve(config: Config, dispatcher: Dispatcher, bind: &str) -> anyhow::Result<()> {
    let state = AppState {
        config: Arc::new(config),
        dispatcher: Arc::new(dispatcher),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on http://{bind}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("received shutdown signal");
        })
        .await?;

    Ok(())
}
