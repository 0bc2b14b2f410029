//! Custom Resource Definitions (CRDs) validated by the webhook.
//!
//! - `WorkerPool`: a pool of identical worker pods

mod worker_pool;

pub use worker_pool::*;
