//! Upload storage for customer model files.
//!
//! Files land under `orders/{order_number}/` once an order number is known,
//! otherwise under `uploads/`. Each object is named
//! `{timestamp}-{random}.{ext}` so concurrent uploads never collide.

use crate::errors::{Error, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["stl", "obj", "3mf"];
/// Default upload size limit (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Where an upload was stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    /// Path relative to the store root, always `/`-separated
    pub path: String,
    /// URL the file is served from
    pub url: String,
    pub size: u64,
    /// blake3 hex digest of the contents
    pub checksum: String,
}

/// Builds the storage key for a new upload.
///
/// # Errors
/// Returns [`Error::Validation`] for a disallowed extension or an order number
/// that is not a single safe path segment.
pub fn object_key(order_number: Option<&str>, file_name: &str) -> Result<String> {
    let extension = crate::core::mesh::ModelFormat::extension_of(file_name)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            Error::validation(format!(
                "Unsupported file type for '{file_name}'. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;

    let timestamp = chrono::Utc::now().timestamp_millis();
    let random = &uuid::Uuid::new_v4().simple().to_string()[..8];
    let object = format!("{timestamp}-{random}.{extension}");

    match order_number.map(str::trim).filter(|n| !n.is_empty()) {
        Some(number) => {
            let safe = number
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !safe {
                return Err(Error::validation(format!(
                    "Invalid order number '{number}'"
                )));
            }
            Ok(format!("orders/{number}/{object}"))
        }
        None => Ok(format!("uploads/{object}")),
    }
}

/// Object store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
    max_bytes: u64,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Largest accepted upload in bytes
    #[must_use]
    pub const fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(Error::validation(format!("Invalid storage path '{key}'")));
        }
        Ok(self.root.join(relative))
    }

    /// Stores an upload and returns its location.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for empty, oversized or disallowed files,
    /// [`Error::Io`] when writing fails.
    pub async fn put(
        &self,
        order_number: Option<&str>,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredObject> {
        let size = bytes.len() as u64;
        if size == 0 {
            return Err(Error::validation("Uploaded file is empty"));
        }
        if size > self.max_bytes {
            return Err(Error::validation(format!(
                "File is {size} bytes, limit is {} bytes",
                self.max_bytes
            )));
        }

        let key = object_key(order_number, file_name)?;
        let path = self.resolve(&key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(path = %key, size, "Stored upload");
        Ok(StoredObject {
            url: self.public_url(&key),
            checksum: blake3::hash(bytes).to_hex().to_string(),
            path: key,
            size,
        })
    }

    /// Reads a stored object back.
    ///
    /// # Errors
    /// Returns [`Error::Io`] when the object cannot be read.
    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        Ok(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_object_key_layout() {
        let key = object_key(Some("BP-20260101-ABC123"), "Part.STL").unwrap();
        assert!(key.starts_with("orders/BP-20260101-ABC123/"));
        assert!(key.ends_with(".stl"));

        let key = object_key(None, "part.obj").unwrap();
        let name = key.strip_prefix("uploads/").unwrap();
        let (timestamp, rest) = name.split_once('-').unwrap();
        assert!(timestamp.parse::<i64>().is_ok());
        assert_eq!(rest.len(), "abcdef12.obj".len());
    }

    #[test]
    fn test_object_key_rejects_bad_input() {
        assert!(object_key(None, "virus.exe").is_err());
        assert!(object_key(None, "noextension").is_err());
        assert!(object_key(Some("../etc"), "part.stl").is_err());
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost:8080/files/", 1024);

        let stored = store.put(None, "cube.stl", b"solid cube").await.unwrap();
        assert_eq!(stored.size, 10);
        assert_eq!(stored.url, format!("http://localhost:8080/files/{}", stored.path));
        assert_eq!(stored.checksum, blake3::hash(b"solid cube").to_hex().to_string());
        assert_eq!(store.get(&stored.path).await.unwrap(), b"solid cube");
    }

    #[tokio::test]
    async fn test_put_enforces_limits() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost", 4);

        assert!(matches!(
            store.put(None, "cube.stl", b"").await,
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            store.put(None, "cube.stl", b"too large").await,
            Err(Error::Validation { .. })
        ));
        assert!(store.get("../outside").await.is_err());
    }
}
