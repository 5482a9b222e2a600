//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use hestia_app::ports::{BridgeClient, MediaKeys};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and logs each request/response through a
/// [`TraceLayer`].
pub fn build<B, M>(state: AppState<B, M>) -> Router
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
