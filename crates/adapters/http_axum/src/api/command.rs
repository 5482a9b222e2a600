//! Free-text commands and status text.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use hestia_app::ports::{BridgeClient, MediaKeys};

use crate::state::AppState;

#[derive(Deserialize)]
pub struct CommandRequest {
    pub text: String,
}

/// `handled` is false when the text is not a home command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub handled: bool,
    pub result: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub device: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// `POST /api/command`
pub async fn run<B, M>(
    State(state): State<AppState<B, M>>,
    Json(req): Json<CommandRequest>,
) -> Json<CommandResponse>
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    let result = state.home.process_command(&req.text).await;
    Json(CommandResponse {
        handled: result.is_some(),
        result,
    })
}

/// `GET /api/status`
pub async fn status<B, M>(
    State(state): State<AppState<B, M>>,
    Query(query): Query<StatusQuery>,
) -> Json<StatusResponse>
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    let status = state.home.status(query.device.as_deref()).await;
    Json(StatusResponse { status })
}
