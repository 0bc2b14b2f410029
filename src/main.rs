//! admission-webhook - validating admission webhook for WorkerPool resources.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Loads configuration from the environment
//! - Starts the health server, and the webhook server when TLS certificates exist

use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};

use admission_webhook::health::{HealthState, run_health_server};
use admission_webhook::{Config, default_webhooks, run_webhook_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("admission_webhook=info".parse()?),
        )
        .json()
        .init();

    info!("Starting admission-webhook");

    let config = Config::from_env()?;
    info!(
        webhook_port = config.webhook_port,
        health_port = config.health_port,
        "Loaded configuration"
    );

    // Refuse to serve at all if a webhook cannot be wired
    let webhooks = default_webhooks()?;

    // Create shared health state
    let health_state = Arc::new(HealthState::new());

    // Start health server immediately so probes work before TLS is loaded
    let health_handle = {
        let health_state = health_state.clone();
        let port = config.health_port;
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state, port).await {
                error!("Health server error: {}", e);
            }
        })
    };

    // Optionally start webhook server if certificates are available. The
    // server marks the pod ready itself once TLS has loaded; without it the
    // pod stays not ready so no admission traffic is routed here.
    let webhook_handle = if config.tls_available() {
        info!("TLS certificates found, starting webhook server");
        let health_state = health_state.clone();
        let webhook_config = config.clone();
        Some(tokio::spawn(async move {
            if let Err(e) =
                run_webhook_server(webhooks, Some(health_state), &webhook_config).await
            {
                error!("Webhook server error: {}", e);
            }
        }))
    } else {
        info!(
            cert_path = %config.cert_path.display(),
            "Webhook certificates not found, webhook server disabled"
        );
        None
    };

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        result = async {
            match webhook_handle {
                Some(handle) => handle.await,
                None => std::future::pending().await,
            }
        } => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready so the API server stops routing reviews here
            health_state.set_ready(false).await;
            info!("Marked webhook as not ready");

            info!(
                "Waiting {}s for in-flight admission requests to complete...",
                config.shutdown_grace_period.as_secs()
            );
            tokio::time::sleep(config.shutdown_grace_period).await;

            info!("Grace period complete, shutting down");
        }
    }

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut down
/// gracefully without them.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
