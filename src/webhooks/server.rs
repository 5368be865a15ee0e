//! Admission webhook server.
//!
//! Provides the HTTP endpoint for the Repository validating webhook.
//!
//! To enable the webhook:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration for repositories
//! 3. Mount the TLS certificate secret to the webhook pod at /etc/webhook/certs/

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use tracing::{debug, error, info, warn};

use crate::health::HealthState;
use crate::webhooks::RepositoryValidator;
use crate::webhooks::policies::ValidationResult;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub validator: RepositoryValidator,
    pub health: Arc<HealthState>,
}

impl WebhookState {
    pub fn new(validator: RepositoryValidator, health: Arc<HealthState>) -> Self {
        Self { validator, health }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason(
    request: &AdmissionRequest<DynamicObject>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
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

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/validate-repository", post(validate_repository))
        .with_state(state)
}

/// Repository admission webhook handler.
///
/// The review carries a DynamicObject rather than a typed Repository so that
/// requests for unrelated kinds can be narrowed (and passed through) instead
/// of failing deserialization.
async fn validate_repository(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
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
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );

    let started = Instant::now();
    let result = match request.operation {
        Operation::Delete => state.validator.validate_delete(request.old_object.as_ref()),
        Operation::Create | Operation::Update => match &request.object {
            Some(obj) => {
                if request.operation == Operation::Update {
                    state
                        .validator
                        .validate_update(request.old_object.as_ref(), obj)
                } else {
                    state.validator.validate_create(obj)
                }
            }
            None => {
                error!(uid = %uid, "Missing object in request");
                return (
                    StatusCode::OK,
                    Json(deny_with_reason(
                        &request,
                        "Missing object in request",
                        "InvalidRequest",
                    )),
                );
            }
        },
        // CONNECT is never routed here; hold no opinion if it is
        Operation::Connect => ValidationResult::allowed(),
    };

    state.health.metrics.record_admission(
        operation_label(&request.operation),
        result.is_allowed(),
        started.elapsed().as_secs_f64(),
    );

    if !result.is_allowed() {
        let message = result.warnings.join("; ");
        warn!(uid = %uid, message = %message, "Admission request denied");
        return (
            StatusCode::OK,
            Json(deny_with_reason(&request, &message, "URLNotAllowed")),
        );
    }

    info!(uid = %uid, "Admission request allowed");
    (
        StatusCode::OK,
        Json(AdmissionResponse::from(&request).into_review()),
    )
}

/// Errors that can occur when running the webhook server
#[derive(Debug)]
pub enum WebhookError {
    /// TLS configuration error
    TlsConfig(String),
    /// Server error
    Server(String),
}

impl std::fmt::Display for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookError::TlsConfig(msg) => write!(f, "TLS configuration error: {}", msg),
            WebhookError::Server(msg) => write!(f, "Webhook server error: {}", msg),
        }
    }
}

impl std::error::Error for WebhookError {}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0:9443 and serves the /validate-repository endpoint.
/// TLS certificates are loaded from the paths specified.
///
/// # Arguments
/// * `state` - Shared webhook state (validator + health)
/// * `cert_path` - Path to TLS certificate file (PEM format)
/// * `key_path` - Path to TLS private key file (PEM format)
pub async fn run_webhook_server(
    state: Arc<WebhookState>,
    cert_path: &str,
    key_path: &str,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], WEBHOOK_PORT));
    info!(port = WEBHOOK_PORT, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
