//! Deletion protection policy.
//!
//! Tier 3 (Request-aware): needs the requester identity, so it is a
//! `MetaValidator` layered over a resource's own `Validator` rules.
//!
//! Objects annotated `workers.example.com/protected: "true"` can only be
//! deleted by members of an allowed group. All other operations, and deletes
//! of unprotected objects, defer to the wrapped rules.

use std::any::type_name;

use kube::{Resource, ResourceExt};
use tracing::debug;

use crate::admission::{
    Error, MetaValidator, Object, Request, Result, Validator, ValidatorWrapper,
};
use crate::crd::PROTECTED_ANNOTATION;

/// Group allowed to delete protected objects unless configured otherwise
pub const DEFAULT_ADMIN_GROUP: &str = "system:masters";

/// Request-aware validator denying deletion of protected objects
#[derive(Clone, Debug)]
pub struct DeletionProtection<K: Validator> {
    inner: ValidatorWrapper<K>,
    allowed_groups: Vec<String>,
}

impl<K: Validator + Resource> DeletionProtection<K> {
    pub fn new(prototype: K) -> Self {
        Self {
            inner: ValidatorWrapper::new(prototype),
            allowed_groups: vec![DEFAULT_ADMIN_GROUP.to_string()],
        }
    }

    /// Replace the groups allowed to delete protected objects
    pub fn with_allowed_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    fn is_allowed_requester(&self, req: &Request) -> bool {
        req.info
            .user_info
            .groups
            .as_ref()
            .is_some_and(|groups| groups.iter().any(|g| self.allowed_groups.contains(g)))
    }
}

fn is_protected<K: Resource>(resource: &K) -> bool {
    resource
        .annotations()
        .get(PROTECTED_ANNOTATION)
        .is_some_and(|v| v == "true")
}

impl<K: Validator + Resource> MetaValidator for DeletionProtection<K> {
    fn new_object(&self) -> Box<dyn Object> {
        self.inner.new_object()
    }

    fn validate_create(&self, obj: &dyn Object, req: &Request) -> Result<()> {
        self.inner.validate_create(obj, req)
    }

    fn validate_update(&self, obj: &dyn Object, old: &dyn Object, req: &Request) -> Result<()> {
        self.inner.validate_update(obj, old, req)
    }

    fn validate_delete(&self, obj: &dyn Object, req: &Request) -> Result<()> {
        self.inner.validate_delete(obj, req)?;

        let resource = obj.downcast_ref::<K>().ok_or_else(|| Error::TypeMismatch {
            expected: type_name::<K>(),
            found: obj.type_name(),
        })?;

        if !is_protected(resource) {
            return Ok(());
        }

        if self.is_allowed_requester(req) {
            debug!(
                uid = %req.uid,
                name = %resource.name_any(),
                dry_run = req.dry_run(),
                "Deleting protected object as privileged requester"
            );
            return Ok(());
        }

        Err(Error::invalid(format!(
            "{} '{}' is protected from deletion. Remove the {} annotation first.",
            req.info.kind,
            resource.name_any(),
            PROTECTED_ANNOTATION
        )))
    }
}
