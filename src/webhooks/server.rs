//! Admission webhook server.
//!
//! Provides HTTP endpoints for Kubernetes validating admission webhooks.
//!
//! To enable webhooks:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration pointing at the registered paths
//! 3. Mount the TLS certificate secret to the pod at /etc/webhook/certs/
//!
//! The webhook server starts automatically when certificates are present.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::admission::{MetaValidator, Request, ValidatingHandler, Verdict};
use crate::config::Config;
use crate::health::HealthState;

/// A validating handler mounted at an HTTP path
#[derive(Clone)]
pub struct Webhook {
    path: String,
    handler: ValidatingHandler,
}

impl Webhook {
    /// Mount `handler` at `path`
    pub fn validating(path: impl Into<String>, handler: ValidatingHandler) -> Self {
        Self {
            path: path.into(),
            handler,
        }
    }

    /// Create a validating webhook for a request-aware validator
    pub fn validating_for(
        path: impl Into<String>,
        validator: impl MetaValidator + 'static,
    ) -> Self {
        Self::validating(path, ValidatingHandler::new(validator))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler(&self) -> &ValidatingHandler {
        &self.handler
    }
}

/// Shared state for a single webhook route
struct WebhookState {
    webhook: Webhook,
    health: Option<Arc<HealthState>>,
}

/// Metric label for an admission operation
fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Create the webhook router, one POST route per webhook
pub fn create_webhook_router(webhooks: Vec<Webhook>, health: Option<Arc<HealthState>>) -> Router {
    webhooks.into_iter().fold(Router::new(), |router, webhook| {
        let path = webhook.path().to_string();
        info!(path = %path, "Registering validating webhook");
        let state = Arc::new(WebhookState {
            webhook,
            health: health.clone(),
        });
        router.route(&path, post(handle_review).with_state(state))
    })
}

/// Validate an AdmissionReview against the route's handler
async fn handle_review(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let path = state.webhook.path();
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(path = %path, error = %e, "Failed to extract admission request");
            if let Some(health) = &state.health {
                health.metrics.record_invalid_review(path);
            }
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        path = %path,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    let start = Instant::now();
    let verdict = match Request::try_from(&request) {
        Ok(req) => state.webhook.handler().handle(&req),
        Err(e) => Verdict::errored(StatusCode::BAD_REQUEST, e),
    };

    match &verdict {
        Verdict::Allowed => info!(uid = %uid, verdict = %verdict, "Admission request allowed"),
        Verdict::Denied { .. } => {
            warn!(uid = %uid, verdict = %verdict, "Admission request denied")
        }
        Verdict::Errored { .. } => {
            error!(uid = %uid, verdict = %verdict, "Admission request errored")
        }
    }

    if let Some(health) = &state.health {
        health.metrics.record_admission(
            path,
            operation_label(&request.operation),
            verdict.label(),
            start.elapsed().as_secs_f64(),
        );
    }

    (
        StatusCode::OK,
        Json(
            verdict
                .into_response(AdmissionResponse::from(&request))
                .into_review(),
        ),
    )
}

/// Errors that can occur when running the webhook server
#[derive(Error, Debug)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
    /// Server error
    #[error("Webhook server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0 on the configured port and serves every registered webhook.
/// TLS certificates are loaded from the configured paths (PEM format).
///
/// Readiness is only reported once the certificates have loaded and the
/// router is built; on a TLS error the health state stays not ready.
pub async fn run_webhook_server(
    webhooks: Vec<Webhook>,
    health: Option<Arc<HealthState>>,
    config: &Config,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;

    let tls = RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let app = create_webhook_router(webhooks, health.clone());
    if let Some(health) = &health {
        health.set_ready(true).await;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));
    info!(port = config.webhook_port, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
