//! # Error Handling
//!
//! Two layers of errors exist in this service:
//!
//! 1. **Stage errors** (`FetchError`, `TranscriptionError`, `SubmissionError`)
//!    live next to the component that produces them and never cross the HTTP
//!    boundary directly — the pipeline folds them into a flat
//!    `{success: false, error: "..."}` outcome that is served with HTTP 200.
//! 2. **Request errors** (`AppError`) cover everything outside a pipeline run:
//!    malformed input (400) and unexpected handler failures (500). They render
//!    the same flat JSON shape so clients only ever parse one error format.

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Errors surfaced directly by HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Unexpected server-side failure while handling a request
    Internal(String),

    /// Client sent a body we refuse to process
    BadRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, message) = match self {
            AppError::Internal(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                msg.clone(),
            ),
            AppError::BadRequest(msg) => {
                (actix_web::http::StatusCode::BAD_REQUEST, msg.clone())
            }
        };

        HttpResponse::build(status).json(json!({
            "success": false,
            "error": message
        }))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_bad_request_maps_to_400() {
        let err = AppError::BadRequest("Missing required fields: file_url and slack_token".into());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let err = AppError::Internal("boom".into());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display_includes_message() {
        let err = AppError::BadRequest("No JSON data received".into());
        assert!(err.to_string().contains("No JSON data received"));
    }
}
