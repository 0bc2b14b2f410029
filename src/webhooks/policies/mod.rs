//! Validation policies for WorkerPool admission webhooks.
//!
//! Policies are organized into tiers:
//! - Tier 1 (Critical): Always enforced on CREATE and UPDATE (replicas, image)
//! - Tier 2 (Update): Only enforced on UPDATE operations (immutability)
//! - Tier 3 (Request-aware): Needs the admission request (deletion protection)

pub mod image;
pub mod immutability;
pub mod protection;
pub mod replicas;

pub use protection::DeletionProtection;

use crate::admission::{Result, Validator};
use crate::crd::WorkerPool;

/// Context for validation
pub struct ValidationContext<'a> {
    /// The resource being validated
    pub resource: &'a WorkerPool,
    /// The old resource (for UPDATE operations)
    pub old_resource: Option<&'a WorkerPool>,
}

impl<'a> ValidationContext<'a> {
    pub fn create(resource: &'a WorkerPool) -> Self {
        Self {
            resource,
            old_resource: None,
        }
    }

    pub fn update(resource: &'a WorkerPool, old_resource: &'a WorkerPool) -> Self {
        Self {
            resource,
            old_resource: Some(old_resource),
        }
    }

    /// Check if this is an UPDATE operation
    pub fn is_update(&self) -> bool {
        self.old_resource.is_some()
    }
}

/// Run all validation policies
pub fn validate_all(ctx: &ValidationContext<'_>) -> Result<()> {
    // Tier 1: Critical validations (always enforced)
    replicas::validate(ctx)?;
    image::validate(ctx)?;

    // Tier 2: Update validations (only for UPDATE operations)
    if ctx.is_update() {
        immutability::validate(ctx)?;
    }

    Ok(())
}

impl Validator for WorkerPool {
    fn validate_create(&self) -> Result<()> {
        validate_all(&ValidationContext::create(self))
    }

    fn validate_update(&self, old: &Self) -> Result<()> {
        validate_all(&ValidationContext::update(self, old))
    }

    fn validate_delete(&self) -> Result<()> {
        Ok(())
    }
}
