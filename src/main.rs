//! repository-webhook - A validating admission webhook for Repository resources.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Loads the URL prefix allow list from configuration
//! - Starts the health server and the TLS webhook server

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info};

use repository_webhook::allowlist::load_allow_list;
use repository_webhook::health::{HealthState, run_health_server};
use repository_webhook::webhooks::{
    RepositoryValidator, UrlValidator, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WebhookState,
    run_webhook_server,
};

/// Environment variable naming the allow list config file.
/// Unset or empty means no allow list was configured.
const ALLOW_LIST_PATH_ENV: &str = "URL_ALLOW_LIST_PATH";

/// Grace period for in-flight admission requests to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("repository_webhook=info".parse()?)
                .add_directive("kube=info".parse()?),
        )
        .json()
        .init();

    info!("Starting repository-webhook");

    // Load the allow list once; config errors are fatal at startup
    let allow_list_path = std::env::var(ALLOW_LIST_PATH_ENV).unwrap_or_default();
    let allow_list = load_allow_list(&allow_list_path, |path| std::fs::read(path))?;

    let validator = RepositoryValidator::new(UrlValidator::new(allow_list));

    // Create shared health state
    let health_state = Arc::new(HealthState::new());
    let webhook_state = Arc::new(WebhookState::new(validator, health_state.clone()));

    // Start health server immediately (probes should work while TLS warms up)
    let health_handle = {
        let health_state = health_state.clone();
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state).await {
                error!("Health server error: {}", e);
            }
        })
    };

    // Start the webhook server; missing certificates surface as a TLS error
    let webhook_handle = tokio::spawn(async move {
        if let Err(e) = run_webhook_server(webhook_state, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH).await
        {
            error!("Webhook server error: {}", e);
        }
    });

    health_state.set_ready(true).await;

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = webhook_handle => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready to stop receiving new requests
            health_state.set_ready(false).await;
            info!("Marked webhook as not ready");

            // Give in-flight admission requests time to complete
            info!(
                "Waiting {}s for in-flight requests to complete...",
                SHUTDOWN_GRACE_PERIOD_SECS
            );
            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;

            info!("Grace period complete, shutting down");
        }
    }

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut down
/// gracefully without them. Using expect() here is intentional.
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
