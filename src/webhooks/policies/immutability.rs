//! Immutability validation policy.
//!
//! Tier 2 (Update): Only enforced on UPDATE operations
//!
//! Validates:
//! - Prevents scaling to zero from a running state
//! - The image repository cannot be changed after creation

use super::ValidationContext;
use crate::admission::{Error, Result};

/// Validate immutability constraints on UPDATE operations
pub fn validate(ctx: &ValidationContext<'_>) -> Result<()> {
    let Some(old) = ctx.old_resource else {
        return Ok(()); // Not an UPDATE
    };

    let new = ctx.resource;

    // Prevent scaling from non-zero to zero
    if old.spec.replicas > 0 && new.spec.replicas == 0 {
        return Err(Error::invalid(
            "Cannot scale down from a running state to 0 replicas. Delete the resource instead.",
        ));
    }

    if old.spec.image.repository != new.spec.image.repository {
        return Err(Error::invalid(format!(
            "spec.image.repository is immutable (was {}, got {})",
            old.spec.image.repository, new.spec.image.repository
        )));
    }

    Ok(())
}
