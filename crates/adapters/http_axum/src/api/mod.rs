//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod command;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod scenes;

use axum::Router;
use axum::routing::{get, post, put};

use hestia_app::ports::{BridgeClient, MediaKeys};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<B, M>() -> Router<AppState<B, M>>
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    Router::new()
        // Free text and status
        .route("/command", post(command::run::<B, M>))
        .route("/status", get(command::status::<B, M>))
        // Devices
        .route("/devices", get(devices::list::<B, M>))
        .route("/devices/{id}", get(devices::get::<B, M>))
        // Scenes
        .route("/scenes", get(scenes::list::<B, M>))
        .route("/scenes/{name}", put(scenes::upsert::<B, M>))
        .route("/scenes/{name}/activate", post(scenes::activate::<B, M>))
}
