//! Webhook module for validating admission requests.
//!
//! This module provides ValidatingAdmissionWebhooks with tiered validation policies:
//! - Tier 1 (Critical): Always enforced (e.g., replica validation)
//! - Tier 2 (Update): Only on UPDATE operations (e.g., immutability)
//! - Tier 3 (Request-aware): Needs the admission request (e.g., deletion protection)

pub mod policies;
mod server;

pub use policies::{DeletionProtection, ValidationContext};
pub use server::{Webhook, WebhookError, create_webhook_router, run_webhook_server};

use crate::admission::{Error, ValidatingHandler};
use crate::crd::WorkerPool;

/// Path of the WorkerPool validating webhook
pub const WORKER_POOL_PATH: &str = "/validate-workerpool";

/// Webhooks served by the binary
pub fn default_webhooks() -> Result<Vec<Webhook>, Error> {
    let handler = ValidatingHandler::builder()
        .validator(DeletionProtection::new(WorkerPool::empty()))
        .build()?;
    Ok(vec![Webhook::validating(WORKER_POOL_PATH, handler)])
}
