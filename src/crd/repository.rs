//! Repository Custom Resource Definition.
//!
//! The webhook does not own this resource; it mirrors the served schema so
//! admitted objects can be narrowed to a typed shape. Only the source URL is
//! consumed here.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Repository registers a source code repository with the control plane.
///
/// Example:
/// ```yaml
/// apiVersion: pipelinesascode.tekton.dev/v1alpha1
/// kind: Repository
/// metadata:
///   name: my-repo
/// spec:
///   url: https://github.com/org/repo
/// ```
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "pipelinesascode.tekton.dev",
    version = "v1alpha1",
    kind = "Repository",
    plural = "repositories",
    shortname = "repo",
    namespaced,
    printcolumn = r#"{"name":"URL", "type":"string", "jsonPath":".spec.url"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySpec {
    /// URL of the source code repository.
    /// An absent field deserializes to the empty string, which never passes
    /// a non-empty allow list.
    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use kube::Resource;

    #[test]
    fn test_group_version_kind() {
        assert_eq!(Repository::kind(&()), "Repository");
        assert_eq!(
            Repository::api_version(&()),
            "pipelinesascode.tekton.dev/v1alpha1"
        );
        assert_eq!(Repository::plural(&()), "repositories");
    }

    #[test]
    fn test_spec_serialization() {
        let spec = RepositorySpec {
            url: "https://github.com/org/repo".to_string(),
        };

        let json = serde_json::to_string(&spec).expect("serialization should succeed");
        let parsed: RepositorySpec =
            serde_json::from_str(&json).expect("deserialization should succeed");

        assert_eq!(parsed.url, "https://github.com/org/repo");
    }

    #[test]
    fn test_missing_url_defaults_to_empty() {
        let parsed: RepositorySpec = serde_json::from_str("{}").expect("spec without url parses");
        assert_eq!(parsed.url, "");
    }
}
