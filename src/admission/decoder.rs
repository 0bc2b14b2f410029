//! Decoding of raw admission payloads into resource instances.

use super::error::DecodeError;
use super::object::{Object, RawObject};
use super::request::Request;

/// Decodes raw objects from admission requests.
///
/// Holds no state, so a single decoder can be shared across concurrent requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode the request's primary object into `into`
    pub fn decode(&self, req: &Request, into: &mut dyn Object) -> Result<(), DecodeError> {
        self.decode_raw(&req.object, into)
    }

    /// Decode `raw` into `into`, leaving `into` unmodified on error
    pub fn decode_raw(&self, raw: &RawObject, into: &mut dyn Object) -> Result<(), DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }
        into.decode_json(raw.as_bytes())?;
        Ok(())
    }
}
