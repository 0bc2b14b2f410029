//! admission-webhook library crate
//!
//! This module exports the validating admission core, the webhook server,
//! the example CRD and its policies, and the health server.

pub mod admission;
pub mod config;
pub mod crd;
pub mod health;
pub mod webhooks;

pub use admission::{
    Decoder, MetaValidator, Request, ValidatingHandler, Validator, ValidatorWrapper, Verdict,
};
pub use config::Config;
pub use health::HealthState;
pub use webhooks::{Webhook, WebhookError, default_webhooks, run_webhook_server};
