use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// Content-addressed attachment storage.
///
/// Files are named `{namespace}_{sha256}.{ext}`, so identical bytes in
/// the same namespace collapse to a single file and a repeated put is a
/// no-op. The namespace is the owning thread id, which is what makes
/// thread-scoped cascade deletion possible.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under a namespace-scoped, content-derived filename.
    ///
    /// Idempotent: an existing file with the same hash is left untouched.
    /// New content goes to a temporary sibling first and is renamed into
    /// place, so a reader never observes a partial file.
    pub async fn put(&self, bytes: &[u8], extension: &str, namespace: &str) -> Result<String> {
        fs::create_dir_all(&self.root).await?;

        let filename = format!("{}_{}.{}", namespace, sha256_hex(bytes), extension);
        let target = self.root.join(&filename);

        if fs::try_exists(&target).await? {
            return Ok(filename);
        }

        let staging = self.root.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&staging, bytes).await?;
        fs::rename(&staging, &target).await?;

        Ok(filename)
    }

    /// Read an attachment back by filename.
    pub async fn get(&self, filename: &str) -> Result<Vec<u8>> {
        match fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::AttachmentNotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, filename: &str) -> bool {
        fs::try_exists(self.root.join(filename))
            .await
            .unwrap_or(false)
    }

    /// Filesystem path for display collaborators.
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Remove every attachment scoped to `namespace`.
    ///
    /// Runs as part of thread deletion and must be repeatable: missing
    /// files and a missing root are not errors.
    pub async fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let prefix = format!("{}_", namespace);

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if name.starts_with(&prefix) {
                match fs::remove_file(entry.path()).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
