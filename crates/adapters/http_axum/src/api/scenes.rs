//! JSON REST handlers for scenes.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hestia_app::ports::{BridgeClient, MediaKeys};
use hestia_domain::scene::{Action, Scene};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing a scene.
#[derive(Deserialize)]
pub struct UpsertSceneRequest {
    pub actions: Vec<Action>,
}

/// Result of an activation: the report text plus whether every step landed.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActivationResponse {
    pub scene: String,
    pub complete: bool,
    pub result: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Scene>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/scenes`
pub async fn list<B, M>(State(state): State<AppState<B, M>>) -> ListResponse
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    ListResponse::Ok(Json(state.home.scenes().list()))
}

/// `PUT /api/scenes/{name}`
pub async fn upsert<B, M>(
    State(state): State<AppState<B, M>>,
    Path(name): Path<String>,
    Json(req): Json<UpsertSceneRequest>,
) -> Result<Json<Scene>, ApiError>
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    let scene = state.home.scenes().create(&name, req.actions)?;
    Ok(Json(scene))
}

/// `POST /api/scenes/{name}/activate`
pub async fn activate<B, M>(
    State(state): State<AppState<B, M>>,
    Path(name): Path<String>,
) -> Result<Json<ActivationResponse>, ApiError>
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    let home = &state.home;
    let report = home.scenes().activate(&name, home.dispatcher()).await?;
    Ok(Json(ActivationResponse {
        complete: report.is_complete(),
        result: report.to_string(),
        scene: report.scene,
    }))
}
