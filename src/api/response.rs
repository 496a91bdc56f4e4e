//! Response types for the PIAWE payment API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code, details) = match &error {
            EngineError::MissingField { .. } => (
                StatusCode::BAD_REQUEST,
                "MISSING_FIELD",
                "A required field was not provided in a person record",
            ),
            EngineError::InvalidType { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_TYPE",
                "A field in a person record has the wrong type",
            ),
            EngineError::InvalidFormat { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_FORMAT",
                "A date or week range is not in the required format",
            ),
            EngineError::InvalidValue { .. } => (
                StatusCode::BAD_REQUEST,
                "INVALID_VALUE",
                "A field in a person record is out of range",
            ),
            EngineError::RuleTableConsistency { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "RULE_TABLE_ERROR",
                "The server's rule table is inconsistent",
            ),
            EngineError::EngineInvariantViolation { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ENGINE_BUG",
                "No payment rule matched; this is a defect in the engine",
            ),
            EngineError::InputNotFound { .. }
            | EngineError::InputParse { .. }
            | EngineError::MissingEnvelopeKey { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INPUT_ERROR",
                "The server could not load its input",
            ),
        };

        ApiErrorResponse {
            status,
            error: ApiError::with_details(code, message, details),
        }
    }
}
