//! Validation capabilities.
//!
//! - [`Validator`]: context-free rules implemented by the resource type itself
//! - [`MetaValidator`]: rules that also see the admission request (user info,
//!   dry-run flag, ...)
//! - [`ValidatorWrapper`]: lets a `Validator` be used wherever a
//!   `MetaValidator` is expected

use std::any::type_name;
use std::sync::Arc;

use super::error::{Error, Result};
use super::object::Object;
use super::request::Request;

/// Context-free validation of a resource, implemented by the resource type.
pub trait Validator: Object + Sized {
    /// Validate that `self` can be created
    fn validate_create(&self) -> Result<()>;

    /// Validate that the resource can be updated from `old` to `self`
    fn validate_update(&self, old: &Self) -> Result<()>;

    /// Validate that `self` can be deleted
    fn validate_delete(&self) -> Result<()>;
}

/// Validation that can also examine the admission request.
pub trait MetaValidator: Send + Sync {
    /// Return a fresh, empty object of the validated type, used as decode target
    fn new_object(&self) -> Box<dyn Object>;

    /// Validate that `obj` can be created
    fn validate_create(&self, obj: &dyn Object, req: &Request) -> Result<()>;

    /// Validate that the object can be updated from `old` to `obj`
    fn validate_update(&self, obj: &dyn Object, old: &dyn Object, req: &Request) -> Result<()>;

    /// Validate that `obj` can be deleted
    fn validate_delete(&self, obj: &dyn Object, req: &Request) -> Result<()>;
}

impl<V: MetaValidator + ?Sized> MetaValidator for Arc<V> {
    fn new_object(&self) -> Box<dyn Object> {
        (**self).new_object()
    }

    fn validate_create(&self, obj: &dyn Object, req: &Request) -> Result<()> {
        (**self).validate_create(obj, req)
    }

    fn validate_update(&self, obj: &dyn Object, old: &dyn Object, req: &Request) -> Result<()> {
        (**self).validate_update(obj, old, req)
    }

    fn validate_delete(&self, obj: &dyn Object, req: &Request) -> Result<()> {
        (**self).validate_delete(obj, req)
    }
}

/// Wraps a [`Validator`] in a [`MetaValidator`], dropping the request.
///
/// The wrapper holds an empty prototype of `T`; objects handed back to it
/// must be copies of that prototype; anything else is reported as
/// [`Error::TypeMismatch`].
#[derive(Clone, Debug)]
pub struct ValidatorWrapper<T: Validator> {
    prototype: T,
}

impl<T: Validator> ValidatorWrapper<T> {
    pub fn new(prototype: T) -> Self {
        Self { prototype }
    }

    fn downcast<'a>(&self, obj: &'a dyn Object) -> Result<&'a T> {
        obj.downcast_ref::<T>().ok_or_else(|| Error::TypeMismatch {
            expected: type_name::<T>(),
            found: obj.type_name(),
        })
    }
}

impl<T: Validator + Default> Default for ValidatorWrapper<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Validator> From<T> for ValidatorWrapper<T> {
    fn from(prototype: T) -> Self {
        Self::new(prototype)
    }
}

impl<T: Validator> MetaValidator for ValidatorWrapper<T> {
    fn new_object(&self) -> Box<dyn Object> {
        self.prototype.deep_copy()
    }

    fn validate_create(&self, obj: &dyn Object, _req: &Request) -> Result<()> {
        self.downcast(obj)?.validate_create()
    }

    fn validate_update(&self, obj: &dyn Object, old: &dyn Object, _req: &Request) -> Result<()> {
        let obj = self.downcast(obj)?;
        let old = self.downcast(old)?;
        obj.validate_update(old)
    }

    fn validate_delete(&self, obj: &dyn Object, _req: &Request) -> Result<()> {
        self.downcast(obj)?.validate_delete()
    }
}

// Every wrapped validator must satisfy the request-aware contract.
const _: () = {
    fn assert_meta_validator<V: MetaValidator>() {}

    #[allow(dead_code)]
    fn assert_wrapper<T: Validator>() {
        assert_meta_validator::<ValidatorWrapper<T>>();
        assert_meta_validator::<Arc<dyn MetaValidator>>();
    }
};
