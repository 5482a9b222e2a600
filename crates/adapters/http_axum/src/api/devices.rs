//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hestia_app::ports::{BridgeClient, MediaKeys};
use hestia_app::registry::DeviceFilter;
use hestia_domain::device::{Device, DeviceKind, Platform};
use hestia_domain::error::HestiaError;
use hestia_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional list filter; `kind` wins when both are given.
#[derive(Deserialize)]
pub struct ListQuery {
    pub kind: Option<DeviceKind>,
    pub platform: Option<Platform>,
}

impl ListQuery {
    fn filter(&self) -> DeviceFilter {
        match (self.kind, self.platform) {
            (Some(kind), _) => DeviceFilter::Kind(kind),
            (None, Some(platform)) => DeviceFilter::Platform(platform),
            (None, None) => DeviceFilter::All,
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/devices`
pub async fn list<B, M>(
    State(state): State<AppState<B, M>>,
    Query(query): Query<ListQuery>,
) -> ListResponse
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    let devices = state.home.registry().list(query.filter()).await;
    ListResponse::Ok(Json(devices))
}

/// `GET /api/devices/{id}`, by id or case-insensitive name.
pub async fn get<B, M>(
    State(state): State<AppState<B, M>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    let device = state
        .home
        .registry()
        .find(&id)
        .await
        .ok_or(HestiaError::DeviceNotFound(DeviceId::from(id)))?;
    Ok(GetResponse::Ok(Json(device)))
}
