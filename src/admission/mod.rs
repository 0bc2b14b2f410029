//! Core of the validating admission webhook.
//!
//! A [`ValidatingHandler`] decodes the objects carried by an admission
//! [`Request`] and runs a [`MetaValidator`] against them, producing a
//! [`Verdict`]. Plain [`Validator`]s are adapted with [`ValidatorWrapper`].

mod decoder;
mod error;
mod handler;
mod object;
mod request;
mod validator;
mod verdict;

pub use decoder::Decoder;
pub use error::{DecodeError, Error, Result};
pub use handler::{ValidatingHandler, ValidatingHandlerBuilder};
pub use object::{Object, RawObject};
pub use request::{Request, RequestInfo};
pub use validator::{MetaValidator, Validator, ValidatorWrapper};
pub use verdict::Verdict;

// Re-export kube-rs admission types used at the API surface
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
