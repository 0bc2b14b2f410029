//! Type-erased resource instances and their raw encoded form.

use std::any::{Any, type_name};
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A decodable, deep-copyable resource instance.
///
/// Implemented for every `Clone + DeserializeOwned` type, so custom resources
/// and plain structs alike can flow through a handler as `dyn Object`.
pub trait Object: Any + Send + Sync + fmt::Debug {
    /// Produce an independent copy sharing no mutable storage with `self`
    fn deep_copy(&self) -> Box<dyn Object>;

    /// Name of the concrete type, for error messages
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Replace `self` with the value encoded in `bytes`.
    ///
    /// `self` is left untouched when decoding fails.
    fn decode_json(&mut self, bytes: &[u8]) -> Result<(), serde_json::Error>;
}

impl<T> Object for T
where
    T: Clone + DeserializeOwned + fmt::Debug + Send + Sync + 'static,
{
    fn deep_copy(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn decode_json(&mut self, bytes: &[u8]) -> Result<(), serde_json::Error> {
        *self = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

impl dyn Object {
    /// Checked downcast to a concrete type
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Raw encoded bytes of a single object, empty when the request carried none
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawObject(Vec<u8>);

impl RawObject {
    /// Encode a value as JSON
    pub fn from_json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::to_vec(value)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for RawObject {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for RawObject {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for RawObject {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for RawObject {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}
