//! Webhook module for validating admission requests.
//!
//! The server decodes admission reviews and dispatches create/update/delete
//! requests to [`RepositoryValidator`], which enforces the URL allow list
//! policy on Repository resources.

pub mod policies;
mod repository;
mod server;

pub use policies::{UrlValidationFailed, UrlValidator, ValidationResult, Warnings};
pub use repository::RepositoryValidator;
pub use server::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError, WebhookState,
    create_webhook_router, run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
