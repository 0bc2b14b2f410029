//! Image validation policy.
//!
//! Tier 1 (Critical): Always enforced

use super::ValidationContext;
use crate::admission::{Error, Result};

const PULL_POLICIES: [&str; 3] = ["Always", "IfNotPresent", "Never"];

/// Validate the worker image
pub fn validate(ctx: &ValidationContext<'_>) -> Result<()> {
    let image = &ctx.resource.spec.image;

    if image.repository.trim().is_empty() {
        return Err(Error::invalid("spec.image.repository is required"));
    }

    if image.tag.trim().is_empty() {
        return Err(Error::invalid("spec.image.tag cannot be empty"));
    }

    if !PULL_POLICIES.contains(&image.pull_policy.as_str()) {
        return Err(Error::invalid(format!(
            "spec.image.pullPolicy must be one of {} (got {})",
            PULL_POLICIES.join(", "),
            image.pull_policy
        )));
    }

    Ok(())
}
