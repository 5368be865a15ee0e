//! Validation policies for Repository admission webhooks.
//!
//! A hook produces a [`ValidationResult`]: either an acceptance, or a denial
//! carrying human-readable warnings plus the [`UrlValidationFailed`] sentinel
//! that the admission framework turns into a rejection.

pub mod url_allowlist;

pub use url_allowlist::UrlValidator;

use thiserror::Error;

/// Human-readable warnings surfaced to the requester alongside a decision.
pub type Warnings = Vec<String>;

/// Sentinel error signaling that a URL did not match any allowed prefix.
///
/// Carries no payload; the context lives in the accompanying warning.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("failed to validate url")]
pub struct UrlValidationFailed;

/// Result of a validation check
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Warnings to surface to the requester (non-empty on denial)
    pub warnings: Warnings,
    /// The validation error (present iff the request is denied)
    pub error: Option<UrlValidationFailed>,
}

impl ValidationResult {
    /// Create an allowed result
    pub fn allowed() -> Self {
        Self::default()
    }

    /// Create a denied result carrying a single warning
    pub fn denied(warning: impl Into<String>) -> Self {
        Self {
            warnings: vec![warning.into()],
            error: Some(UrlValidationFailed),
        }
    }

    /// Whether the request is allowed
    pub fn is_allowed(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_has_no_warnings() {
        let result = ValidationResult::allowed();
        assert!(result.is_allowed());
        assert!(result.warnings.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_denied_carries_warning_and_error() {
        let result = ValidationResult::denied("URL rejected");
        assert!(!result.is_allowed());
        assert_eq!(result.warnings, vec!["URL rejected"]);
        assert_eq!(result.error, Some(UrlValidationFailed));
    }

    #[test]
    fn test_sentinel_display() {
        assert_eq!(UrlValidationFailed.to_string(), "failed to validate url");
    }
}
