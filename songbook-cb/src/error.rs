//! Error types for songbook-cb
//!
//! Every failure of a catalog operation ends up as one user-facing message.
//! Store failures are logged in full and reported generically.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Shared message for any malformed page, level, rating or id text
pub const INVALID_INPUT_MESSAGE: &str = "What on earth are you trying to do? Try Again.";

pub const SONG_NOT_FOUND_MESSAGE: &str = "Such song does not exist!";

pub const RATING_RANGE_MESSAGE: &str = "Rating has to be between 1 and 5!";

pub const STORE_UNAVAILABLE_MESSAGE: &str =
    "The song catalog is not available right now. Try Again later.";

/// Catalog operation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Raw parameter text could not be parsed
    #[error("Invalid {field}: {value:?}")]
    Validation { field: &'static str, value: String },

    /// Song id does not resolve to a catalog entry
    #[error("Song not found: {0}")]
    NotFound(String),

    /// Rating parsed but outside 1..=5
    #[error("Rating out of range: {0}")]
    Range(i64),

    /// No song carries the aggregated attribute
    #[error("No songs carry attribute '{0}'")]
    EmptyAggregation(&'static str),

    /// Store collaborator failed
    #[error("Store error: {0}")]
    Store(#[from] songbook_common::Error),
}

impl CatalogError {
    pub fn validation(field: &'static str, value: impl Into<String>) -> Self {
        CatalogError::Validation {
            field,
            value: value.into(),
        }
    }

    /// The message shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Validation { .. } => INVALID_INPUT_MESSAGE.to_string(),
            CatalogError::NotFound(_) => SONG_NOT_FOUND_MESSAGE.to_string(),
            CatalogError::Range(_) => RATING_RANGE_MESSAGE.to_string(),
            CatalogError::EmptyAggregation(attribute) => {
                format!("There are no songs with a {} to average.", attribute)
            }
            CatalogError::Store(_) => STORE_UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Validation { .. } | CatalogError::Range(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::EmptyAggregation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        if let CatalogError::Store(ref e) = self {
            error!("Catalog store failure: {}", e);
        }

        let body = Json(json!({
            "page": "message",
            "message": self.user_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
