//! Admission verdicts and their mapping onto kube admission responses.

use std::fmt;

use axum::http::StatusCode;
use kube::core::admission::AdmissionResponse;

use super::error::{DecodeError, Error};

/// Outcome of reviewing a single admission request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The change may proceed
    Allowed,
    /// The change violates a business rule
    Denied { reason: String },
    /// The request could not be reviewed
    Errored { code: StatusCode, message: String },
}

impl Verdict {
    pub fn denied(reason: impl Into<String>) -> Self {
        Verdict::Denied {
            reason: reason.into(),
        }
    }

    pub fn errored(code: StatusCode, err: impl fmt::Display) -> Self {
        Verdict::Errored {
            code,
            message: err.to_string(),
        }
    }

    /// Map a validation failure: rule violations deny, contract faults error
    pub fn from_validation(err: Error) -> Self {
        if err.is_denial() {
            Verdict::denied(err.to_string())
        } else {
            Verdict::errored(err.status_code(), err)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Allowed => "allowed",
            Verdict::Denied { .. } => "denied",
            Verdict::Errored { .. } => "errored",
        }
    }

    /// Apply this verdict to a response built from the originating request
    pub fn into_response(self, base: AdmissionResponse) -> AdmissionResponse {
        match self {
            Verdict::Allowed => {
                let mut resp = base;
                resp.allowed = true;
                resp
            }
            Verdict::Denied { reason } => {
                let mut resp = base.deny(reason);
                resp.result.code = StatusCode::FORBIDDEN.as_u16();
                resp
            }
            Verdict::Errored { code, message } => {
                let mut resp = base.deny(message);
                resp.result.code = code.as_u16();
                resp
            }
        }
    }
}

impl From<DecodeError> for Verdict {
    fn from(err: DecodeError) -> Self {
        Verdict::errored(StatusCode::BAD_REQUEST, err)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allowed => write!(f, "allowed"),
            Verdict::Denied { reason } => write!(f, "denied: {}", reason),
            Verdict::Errored { code, message } => {
                write!(f, "errored ({}): {}", code.as_u16(), message)
            }
        }
    }
}
