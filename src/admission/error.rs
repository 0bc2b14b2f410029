//! Error types for admission handling.
//!
//! Decode failures and type-contract violations surface as errored verdicts,
//! business-rule violations as denials.

use axum::http::StatusCode;
use thiserror::Error;

/// Error produced while decoding a raw object into a typed instance
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The request carried no bytes for the object being decoded
    #[error("there is no content to decode")]
    Empty,

    /// The bytes were malformed or did not match the target type
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for admission validation
#[derive(Error, Debug)]
pub enum Error {
    /// Business-rule violation. Displays as the bare message so it can be
    /// used verbatim as a denial reason.
    #[error("{0}")]
    Invalid(String),

    /// A validator was handed an object of a type it does not handle
    #[error("expected object of type {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A handler was built without a validator
    #[error("validator should never be missing")]
    MissingValidator,

    /// Decoding error
    #[error("failed to decode object: {0}")]
    Decode(#[from] DecodeError),
}

impl Error {
    /// Create a business-rule violation with the given message
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Invalid(message.into())
    }

    /// HTTP status to report when this error ends a request as errored
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Decode(_) => StatusCode::BAD_REQUEST,
            Error::TypeMismatch { .. } | Error::MissingValidator => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Invalid(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Check if a validator returning this error should deny the request.
    ///
    /// Only a type mismatch is a fault of the wiring; anything else a
    /// validator reports is its reason for rejecting the change.
    pub fn is_denial(&self) -> bool {
        !matches!(self, Error::TypeMismatch { .. })
    }
}

/// Result type alias for admission validation
pub type Result<T> = std::result::Result<T, Error>;
