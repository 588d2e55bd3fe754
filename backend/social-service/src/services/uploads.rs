//! Profile image storage on the local filesystem
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Write `bytes` under a server-chosen name and return the stored path.
    /// The client filename only contributes its extension.
    pub async fn save(&self, user_id: Uuid, client_filename: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(too_large(self.max_bytes));
        }

        let ext = image_extension(client_filename)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(format!("{}-{}.{}", user_id, Uuid::new_v4(), ext));
        tokio::fs::write(&path, bytes).await?;

        let stored = path.to_string_lossy().into_owned();
        info!(user_id = %user_id, path = %stored, size = bytes.len(), "profile image stored");
        Ok(stored)
    }
}

pub fn too_large(max_bytes: usize) -> AppError {
    AppError::PayloadTooLarge(format!("File exceeds the {} byte upload limit", max_bytes))
}

/// Lower-cased extension if it is an accepted image type.
pub fn image_extension(filename: &str) -> Result<&'static str> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    ALLOWED_EXTENSIONS
        .iter()
        .copied()
        .find(|allowed| *allowed == ext)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported image type; expected one of {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("me.PNG").unwrap(), "png");
        assert_eq!(image_extension("../../etc/passwd.jpeg").unwrap(), "jpeg");
        assert!(image_extension("script.sh").is_err());
        assert!(image_extension("no-extension").is_err());
    }

    #[tokio::test]
    async fn test_save_uses_server_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 1024);
        let user_id = Uuid::new_v4();

        let stored = store.save(user_id, "../evil.png", b"\x89PNG").await.unwrap();
        let stored_path = Path::new(&stored);
        assert_eq!(stored_path.parent().unwrap(), dir.path());
        assert!(stored_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(&user_id.to_string()));
        assert_eq!(tokio::fs::read(stored_path).await.unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_save_rejects_oversize() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 4);
        let err = store.save(Uuid::new_v4(), "a.png", b"12345").await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
