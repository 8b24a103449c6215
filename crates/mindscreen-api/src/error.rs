use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use mindscreen_instruments::scoring::ValidationError;
use mindscreen_instruments::InstrumentError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Invalid(Vec<ValidationError>),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<ValidationError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{} response value(s) outside the declared options", errors.len()),
                errors,
            ),
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                details,
            }),
        )
            .into_response()
    }
}

impl From<InstrumentError> for ApiError {
    fn from(e: InstrumentError) -> Self {
        match e {
            InstrumentError::NotFound(id) => ApiError::NotFound(format!("instrument not found: {id}")),
            InstrumentError::Validation(errors) => ApiError::Invalid(errors),
            other @ (InstrumentError::OutOfRange { .. } | InstrumentError::ScoreMismatch { .. }) => {
                ApiError::BadRequest(other.to_string())
            }
        }
    }
}
