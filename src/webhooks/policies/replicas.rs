//! Replica count validation policy.
//!
//! Tier 1 (Critical): Always enforced
//!
//! Validates:
//! - Replica count is not negative
//! - Replica count does not exceed MAX_REPLICAS

use super::ValidationContext;
use crate::admission::{Error, Result};

/// Upper bound on workers in a single pool
pub const MAX_REPLICAS: i32 = 100;

/// Validate replica count
pub fn validate(ctx: &ValidationContext<'_>) -> Result<()> {
    let replicas = ctx.resource.spec.replicas;

    if replicas < 0 {
        return Err(Error::invalid("replicas must be >= 0"));
    }

    if replicas > MAX_REPLICAS {
        return Err(Error::invalid(format!(
            "replicas cannot exceed {} (got {})",
            MAX_REPLICAS, replicas
        )));
    }

    Ok(())
}
