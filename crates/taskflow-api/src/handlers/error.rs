use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::NOT_FOUND, message)
}

/// Backend failures only surface a generic message; the detail was
/// already logged by the service layer.
pub fn backend_error(error: taskflow_client::Error, message: &str) -> ApiError {
    let status = match error {
        taskflow_client::Error::NotFound { .. } => StatusCode::NOT_FOUND,
        taskflow_client::Error::Api { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, message)
}

pub fn validation_error(error: taskflow_core::Error) -> ApiError {
    bad_request(error.to_string())
}

pub fn local_error(error: taskflow_local::Error) -> ApiError {
    use taskflow_local::Error;

    match error {
        Error::Validation(_) | Error::LastList | Error::InvalidFilter(_) => {
            bad_request(error.to_string())
        }
        Error::ListNotFound(_) | Error::ItemNotFound(_) => not_found(error.to_string()),
        other => {
            tracing::error!("Local store failure: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update local lists")
        }
    }
}
