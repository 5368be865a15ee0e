//! Admission hooks for the Repository resource.
//!
//! Exposes the create/update/delete validation hooks invoked by the webhook
//! server. Objects that are not Repositories are logged and passed through:
//! the webhook holds no opinion on kinds it does not govern.

use kube::Resource;
use kube::core::DynamicObject;
use tracing::info;

use crate::crd::Repository;
use crate::webhooks::policies::{UrlValidator, ValidationResult};

/// Validates Repository admission requests against the URL allow list.
pub struct RepositoryValidator {
    url_validator: UrlValidator,
}

impl RepositoryValidator {
    /// Create a validator delegating URL checks to `url_validator`
    pub fn new(url_validator: UrlValidator) -> Self {
        Self { url_validator }
    }

    /// Validate a CREATE request
    pub fn validate_create(&self, obj: &DynamicObject) -> ValidationResult {
        match try_extract_url(obj) {
            Some(url) => self.url_validator.validate(&url),
            None => ValidationResult::allowed(),
        }
    }

    /// Validate an UPDATE request.
    ///
    /// Only the new object is inspected; the previous state is irrelevant to
    /// the allow list check.
    pub fn validate_update(
        &self,
        _old_obj: Option<&DynamicObject>,
        new_obj: &DynamicObject,
    ) -> ValidationResult {
        match try_extract_url(new_obj) {
            Some(url) => self.url_validator.validate(&url),
            None => ValidationResult::allowed(),
        }
    }

    /// Validate a DELETE request. Deletions are always allowed.
    pub fn validate_delete(&self, _obj: Option<&DynamicObject>) -> ValidationResult {
        ValidationResult::allowed()
    }
}

/// Narrow an admitted object to the Repository source URL.
///
/// Returns `None` when the object is not a Repository (wrong kind, missing
/// type metadata, or an unparsable shape). Callers treat `None` as "not
/// applicable", never as a validation failure. A Repository without a URL
/// narrows to the empty string and is judged by the allow list like any
/// other URL.
fn try_extract_url(obj: &DynamicObject) -> Option<String> {
    let Some(types) = &obj.types else {
        info!(
            name = ?obj.metadata.name,
            "Object has no type metadata, skipping validation"
        );
        return None;
    };

    if types.kind != Repository::kind(&()) || types.api_version != Repository::api_version(&()) {
        info!(
            kind = %types.kind,
            api_version = %types.api_version,
            "Object is not a Repository, skipping validation"
        );
        return None;
    }

    match obj.clone().try_parse::<Repository>() {
        Ok(repo) => Some(repo.spec.url),
        Err(e) => {
            info!(error = %e, "Failed to parse object as a Repository, skipping validation");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use kube::core::TypeMeta;
    use serde_json::json;

    fn allow_list_validator(prefixes: &[&str]) -> RepositoryValidator {
        RepositoryValidator::new(UrlValidator::new(
            prefixes.iter().map(|p| p.to_string()).collect(),
        ))
    }

    fn repository(url: &str) -> DynamicObject {
        DynamicObject {
            types: Some(TypeMeta {
                api_version: "pipelinesascode.tekton.dev/v1alpha1".to_string(),
                kind: "Repository".to_string(),
            }),
            metadata: ObjectMeta {
                name: Some("test-repo".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            data: json!({ "spec": { "url": url } }),
        }
    }

    fn pod() -> DynamicObject {
        DynamicObject {
            types: Some(TypeMeta {
                api_version: "v1".to_string(),
                kind: "Pod".to_string(),
            }),
            metadata: ObjectMeta {
                name: Some("test-pod".to_string()),
                ..Default::default()
            },
            data: json!({ "spec": { "containers": [] } }),
        }
    }

    #[test]
    fn test_create_with_allowed_url() {
        let validator = allow_list_validator(&["https://github.com/org"]);
        let result = validator.validate_create(&repository("https://github.com/org/repo"));
        assert!(result.is_allowed());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_create_with_disallowed_url() {
        let validator = allow_list_validator(&["https://github.com/org"]);
        let result = validator.validate_create(&repository("https://github.com/other-org/repo"));
        assert!(!result.is_allowed());
        assert!(
            result
                .warnings
                .first()
                .unwrap()
                .contains("https://github.com/other-org/repo")
        );
    }

    #[test]
    fn test_create_ignores_other_kinds() {
        // An empty allow list denies every URL, so acceptance here proves the
        // Pod was skipped rather than validated
        let validator = allow_list_validator(&[]);
        let result = validator.validate_create(&pod());
        assert!(result.is_allowed());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_create_ignores_objects_without_type_meta() {
        let validator = allow_list_validator(&[]);
        let mut obj = repository("https://github.com/org/repo");
        obj.types = None;
        assert!(validator.validate_create(&obj).is_allowed());
    }

    #[test]
    fn test_create_with_missing_url_is_denied() {
        let validator = allow_list_validator(&["https://github.com/org"]);
        let mut obj = repository("unused");
        obj.data = json!({ "spec": {} });
        // The url narrows to "" and fails the non-empty allow list
        assert!(!validator.validate_create(&obj).is_allowed());
    }

    #[test]
    fn test_update_inspects_only_new_object() {
        let validator = allow_list_validator(&["https://github.com/org"]);
        let old = repository("https://github.com/other-org/repo");
        let new = repository("https://github.com/org/repo");

        assert!(validator.validate_update(Some(&old), &new).is_allowed());
        assert!(!validator.validate_update(Some(&new), &old).is_allowed());
        assert!(validator.validate_update(None, &new).is_allowed());
    }

    #[test]
    fn test_update_ignores_other_kinds() {
        let validator = allow_list_validator(&[]);
        assert!(validator.validate_update(None, &pod()).is_allowed());
    }

    #[test]
    fn test_delete_is_always_allowed() {
        let validator = allow_list_validator(&[]);

        let result = validator.validate_delete(Some(&repository("https://github.com/org/repo")));
        assert!(result.is_allowed());
        assert!(result.warnings.is_empty());

        assert!(validator.validate_delete(Some(&pod())).is_allowed());
        assert!(validator.validate_delete(None).is_allowed());
    }
}
