//! Validating admission handler.
//!
//! Routes a request to the decode/validate sequence for its operation:
//! - CREATE: decode `object`, validate create
//! - UPDATE: decode `object` and `old_object` into two instances, validate update
//! - DELETE: decode `old_object` (the object being deleted), validate delete
//!
//! Any other operation (e.g. CONNECT) is allowed without decoding or validating.

use std::sync::Arc;

use kube::core::admission::Operation;
use tracing::debug;

use super::decoder::Decoder;
use super::error::Error;
use super::request::Request;
use super::validator::{MetaValidator, Validator, ValidatorWrapper};
use super::verdict::Verdict;

/// Admission handler that decodes objects and runs a [`MetaValidator`] on them.
///
/// Stateless per request; share it behind an `Arc` across concurrent requests.
#[derive(Clone)]
pub struct ValidatingHandler {
    validator: Arc<dyn MetaValidator>,
    decoder: Decoder,
}

impl ValidatingHandler {
    /// Create a handler for a request-aware validator
    pub fn new(validator: impl MetaValidator + 'static) -> Self {
        Self {
            validator: Arc::new(validator),
            decoder: Decoder::new(),
        }
    }

    /// Create a handler for a context-free validator, using `prototype` as the
    /// empty instance objects are decoded into
    pub fn for_validator<T: Validator>(prototype: T) -> Self {
        Self::new(ValidatorWrapper::new(prototype))
    }

    pub fn builder() -> ValidatingHandlerBuilder {
        ValidatingHandlerBuilder::default()
    }

    /// Review a single admission request
    pub fn handle(&self, req: &Request) -> Verdict {
        match self.review(req) {
            Ok(()) => Verdict::Allowed,
            Err(verdict) => verdict,
        }
    }

    fn review(&self, req: &Request) -> Result<(), Verdict> {
        let mut obj = self.validator.new_object();

        match req.operation {
            Operation::Create => {
                self.decoder.decode(req, &mut *obj)?;
                self.validator
                    .validate_create(&*obj, req)
                    .map_err(Verdict::from_validation)?;
            }
            Operation::Update => {
                // Copy before decoding so both instances share a concrete type
                let mut old = obj.deep_copy();

                self.decoder.decode_raw(&req.object, &mut *obj)?;
                self.decoder.decode_raw(&req.old_object, &mut *old)?;

                self.validator
                    .validate_update(&*obj, &*old, req)
                    .map_err(Verdict::from_validation)?;
            }
            Operation::Delete => {
                // DELETE requests carry the object being deleted in old_object
                self.decoder.decode_raw(&req.old_object, &mut *obj)?;
                self.validator
                    .validate_delete(&*obj, req)
                    .map_err(Verdict::from_validation)?;
            }
            _ => {
                debug!(
                    uid = %req.uid,
                    operation = ?req.operation,
                    "No validation for operation, allowing"
                );
            }
        }

        Ok(())
    }
}

/// Builder for [`ValidatingHandler`]; refuses to build without a validator.
#[derive(Default)]
pub struct ValidatingHandlerBuilder {
    validator: Option<Arc<dyn MetaValidator>>,
    decoder: Option<Decoder>,
}

impl ValidatingHandlerBuilder {
    pub fn validator(mut self, validator: impl MetaValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn shared_validator(mut self, validator: Arc<dyn MetaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn build(self) -> Result<ValidatingHandler, Error> {
        let validator = self.validator.ok_or(Error::MissingValidator)?;
        Ok(ValidatingHandler {
            validator,
            decoder: self.decoder.unwrap_or_default(),
        })
    }
}
