//! URL prefix allow list policy.
//!
//! A candidate URL is accepted when it starts with any configured prefix.
//! Matching is a plain byte-wise, case-sensitive prefix test: no scheme or
//! host parsing and no trailing-slash canonicalization.

use super::ValidationResult;

/// Validates candidate URLs against the configured prefix allow list.
///
/// The list is an immutable snapshot taken at construction; `validate` is
/// pure and safe to call from concurrent admission requests.
pub struct UrlValidator {
    allow_list: Vec<String>,
}

impl UrlValidator {
    /// Create a validator over the given prefix list
    pub fn new(allow_list: Vec<String>) -> Self {
        Self { allow_list }
    }

    /// The configured prefix list
    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    /// Validate a candidate URL against the allow list.
    ///
    /// Prefixes are checked in order and the first match wins. No match
    /// denies the URL; an empty list therefore denies every URL.
    pub fn validate(&self, url: &str) -> ValidationResult {
        for prefix in &self.allow_list {
            if url.starts_with(prefix.as_str()) {
                return ValidationResult::allowed();
            }
        }

        ValidationResult::denied(format!(
            "URL {} is not in the allowed list. URL must start with one of: {:?}",
            url, self.allow_list
        ))
    }
}
