//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hestia_domain::error::HestiaError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HestiaError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(HestiaError);

impl From<HestiaError> for ApiError {
    fn from(err: HestiaError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            HestiaError::Validation(_)
            | HestiaError::UnknownColor(_)
            | HestiaError::CapabilityUnsupported { .. }
            | HestiaError::DuplicateId(_) => StatusCode::BAD_REQUEST,
            HestiaError::DeviceNotFound(_)
            | HestiaError::SceneNotFound(_)
            | HestiaError::NoMatchingDevice { .. } => StatusCode::NOT_FOUND,
            HestiaError::PlatformAdapter { .. } | HestiaError::DiscoveryTimeout(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
