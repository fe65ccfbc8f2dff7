use std::path::Path;

use crate::error::ProjectError;

/// Only network URLs may be cloned; local paths and `file://` would let a
/// caller read arbitrary directories on the server.
pub fn validate_url(url: &str) -> Result<(), ProjectError> {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with("git://") {
        Ok(())
    } else {
        Err(ProjectError::UnsupportedUrl)
    }
}

/// Clone a git repository to the target directory.
pub fn clone_repo(url: &str, target: &Path) -> Result<(), ProjectError> {
    tracing::info!("Cloning {} into {}", url, target.display());
    git2::Repository::clone(url.trim(), target).map_err(|e| {
        tracing::error!("Clone of {url} failed: {e}");
        ProjectError::Clone(e.message().to_string())
    })?;
    tracing::info!("Clone complete: {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_allows_network_schemes() {
        assert!(validate_url("https://github.com/rust-lang/log").is_ok());
        assert!(validate_url("http://git.example.com/repo.git").is_ok());
        assert!(validate_url("git://example.com/repo.git").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_local_access() {
        assert!(validate_url("file:///etc").is_err());
        assert!(validate_url("/home/user/repo").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_clone_failure_embeds_underlying_message() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clone");
        // Port 9 (discard) refuses connections without touching the network
        let err = clone_repo("http://127.0.0.1:9/missing.git", &target).unwrap_err();
        assert!(err.to_string().starts_with("Failed to clone repository: "));
        match err {
            ProjectError::Clone(message) => assert!(!message.is_empty()),
            other => panic!("expected clone error, got {other:?}"),
        }
    }
}
