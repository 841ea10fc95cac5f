//! Photo storage collaborator contract.
//!
//! The upload layer itself (size limits, content types, resizing) lives
//! outside this system; the pipelines only see opaque photo paths. What the
//! core does own is the compensating cleanup: every path saved during an
//! operation that subsequently fails must be deleted, best effort.

use std::path::PathBuf;

use uuid::Uuid;

/// Pluggable storage backend for uploaded photos.
#[async_trait::async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Persist raw photo bytes, returning the opaque path stored on the entity.
    async fn save(&self, bytes: &[u8], extension: &str) -> std::io::Result<String>;

    /// Delete a previously saved photo. Returns `false` when the path did
    /// not exist (already cleaned up).
    async fn delete(&self, path: &str) -> bool;
}

/// Filesystem-backed photo storage rooted at a single upload directory.
pub struct LocalPhotoStorage {
    root: PathBuf,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a stored path against the upload root. Paths arrive from
    /// request bodies, so anything that could escape the root (absolute
    /// paths, `..` components) is refused outright.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = std::path::Path::new(path);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)));
        if escapes {
            tracing::warn!(path, "Refusing photo path outside the upload root");
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn save(&self, bytes: &[u8], extension: &str) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;
        let name = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::write(self.root.join(&name), bytes).await?;
        Ok(name)
    }

    async fn delete(&self, path: &str) -> bool {
        let Some(resolved) = self.resolve(path) else {
            return false;
        };
        match tokio::fs::remove_file(resolved).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(error = %e, path, "Failed to delete photo");
                false
            }
        }
    }
}

/// Best-effort cleanup of every photo saved by an operation that failed.
/// Failures are logged and swallowed; the original error stays the one the
/// caller sees.
pub async fn cleanup_photos(storage: &dyn PhotoStorage, paths: &[String]) {
    for path in paths {
        if !storage.delete(path).await {
            tracing::warn!(path, "Photo cleanup skipped (already gone or undeletable)");
        }
    }
}
