use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// The two failure kinds this API surfaces: out-of-bound input and a
/// failing generation backend. Nothing else leaks into response bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("generation backend failure: {0}")]
    Capability(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            ApiError::Capability(cause) => {
                warn!("generation failed: {cause:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": cause.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
