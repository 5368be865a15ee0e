//! repository-webhook library crate
//!
//! This module exports the allow list loader, CRD definitions, and the
//! admission webhook components.

pub mod allowlist;
pub mod crd;
pub mod health;
pub mod webhooks;

pub use allowlist::{AllowListError, load_allow_list};
pub use health::HealthState;
pub use webhooks::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, RepositoryValidator, UrlValidator,
    WebhookError, WebhookState, run_webhook_server,
};
