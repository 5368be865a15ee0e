//! URL prefix allow list loading.
//!
//! The allow list is a JSON array of strings read once at startup. The byte
//! source is injected as a read function so tests (or alternative config
//! sources) can supply content without touching the filesystem.

use thiserror::Error;
use tracing::info;

/// Errors raised while loading the allow list config.
#[derive(Error, Debug)]
pub enum AllowListError {
    /// Underlying byte read failed (missing file, permission denied).
    #[error("failed to read url allow list: {0}")]
    Read(#[from] std::io::Error),

    /// Config bytes were not a JSON array of strings.
    #[error("url allow list is not a JSON string array: {0}")]
    Format(#[from] serde_json::Error),
}

/// Load the allowed URL prefixes from a config file.
///
/// An empty `path` means no allow list was configured and yields an empty
/// list without invoking the reader. Duplicate entries and ordering are
/// preserved as-is.
///
/// Errors are fatal to startup: the process is expected to fail fast when its
/// configuration cannot be read or parsed.
pub fn load_allow_list(
    path: &str,
    reader: impl FnOnce(&str) -> std::io::Result<Vec<u8>>,
) -> Result<Vec<String>, AllowListError> {
    if path.is_empty() {
        info!("URL prefix allow list config was not provided");
        return Ok(Vec::new());
    }

    let content = reader(path)?;
    let list: Vec<String> = serde_json::from_slice(&content)?;

    info!(config = ?list, "Using URL prefix allow list");

    Ok(list)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty_file() {
        let list = load_allow_list("file", |_| Ok(b"[]".to_vec())).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_load_non_empty_file() {
        // Duplicates and ordering are preserved
        let content = br#"
            [
                "a",
                "b",
                "b"
            ]
        "#;
        let list = load_allow_list("file", |_| Ok(content.to_vec())).unwrap();
        assert_eq!(list, vec!["a", "b", "b"]);
    }

    #[test]
    fn test_empty_path_skips_reader() {
        let list = load_allow_list("", |_| unreachable!("reader must not be invoked")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_broken_json() {
        let err = load_allow_list("file", |_| Ok(b"abc".to_vec())).unwrap_err();
        assert!(matches!(err, AllowListError::Format(_)));
    }

    #[test]
    fn test_read_error_is_propagated() {
        let err = load_allow_list("file", |_| {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "random error",
            ))
        })
        .unwrap_err();

        match err {
            AllowListError::Read(io_err) => {
                assert_eq!(io_err.kind(), std::io::ErrorKind::PermissionDenied);
                assert_eq!(io_err.to_string(), "random error");
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_reader_receives_path() {
        let list = load_allow_list("/etc/webhook/allowlist.json", |path| {
            assert_eq!(path, "/etc/webhook/allowlist.json");
            Ok(br#"["https://github.com/org"]"#.to_vec())
        })
        .unwrap();
        assert_eq!(list, vec!["https://github.com/org"]);
    }
}
