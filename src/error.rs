// Error handling module for the Bookshop API
// Provides the handler-boundary error type and its HTTP response conversion

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{debug, error};

use crate::store::StoreError;

/// Error type returned by the book and health handlers
///
/// Each variant maps to exactly one HTTP status code. Not-found outcomes are
/// reported under a `message` key, everything else under `error`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request input, such as an unparseable identifier
    /// Maps to HTTP 400 Bad Request
    BadRequest(String),

    /// Request body was not JSON of the expected shape
    /// Keeps the rejection's status: 400 syntax, 415 content type, 422 shape
    InvalidBody(JsonRejection),

    /// No document matched the request
    /// Maps to HTTP 404 Not Found
    NotFound { message: String },

    /// Document store failures
    /// Maps to HTTP 500 Internal Server Error
    Store(StoreError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                json!({ "error": message })
            }
            ApiError::InvalidBody(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                json!({ "error": rejection.body_text() })
            }
            ApiError::NotFound { message } => {
                debug!("Not found: {}", message);
                json!({ "message": message })
            }
            ApiError::Store(store_error) => {
                error!("Store error: {:?}", store_error);
                json!({ "error": store_error.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Store(error)
    }
}
