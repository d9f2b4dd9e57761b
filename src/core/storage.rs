//! File storage - Salvataggio dei file caricati su disco locale
//!
//! I file finiscono in `<root>/<yyyy-MM>/<uuid><ext>`; nel database si salva
//! solo il percorso relativo alla root.

use crate::core::AppError;
use crate::core::config::StorageSettings;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: [&str; 11] = [
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".jpg", ".jpeg", ".png", ".zip", ".rar", ".txt",
];

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub relative_path: String,
    pub extension: String,
    pub size: u64,
}

pub struct FileStorage {
    root: PathBuf,
    max_file_size: u64,
}

/// Lower-cased extension including the leading dot, empty if there is none.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

impl FileStorage {
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            root: settings.upload_path.clone(),
            max_file_size: settings.max_file_size,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Checks size and extension, returning the normalized extension.
    pub fn validate(&self, file_name: &str, size: u64) -> Result<String, AppError> {
        if size == 0 {
            return Err(AppError::bad_request("No file selected"));
        }
        if size > self.max_file_size {
            return Err(AppError::payload_too_large("File is too large").with_details(format!(
                "Maximum size is {} MB",
                self.max_file_size / 1024 / 1024
            )));
        }

        let extension = file_extension(file_name);
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(
                AppError::bad_request("File extension not allowed").with_details(format!(
                    "Allowed extensions: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                )),
            );
        }
        Ok(extension)
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<StoredFile, AppError> {
        let extension = self.validate(file_name, bytes.len() as u64)?;

        let year_month = Utc::now().format("%Y-%m").to_string();
        let directory = self.root.join(&year_month);
        fs::create_dir_all(&directory).await?;

        let unique_name = format!("{}{}", Uuid::new_v4(), extension);
        fs::write(directory.join(&unique_name), bytes).await?;

        let relative_path = format!("{}/{}", year_month, unique_name);
        info!("Stored upload {} as {}", file_name, relative_path);

        Ok(StoredFile {
            relative_path,
            extension,
            size: bytes.len() as u64,
        })
    }

    /// Reads a stored file back; `None` when it no longer exists on disk.
    #[instrument(skip(self))]
    pub async fn read(&self, relative_path: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.resolve(relative_path)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Physical file missing: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a stored file; a file already gone is not an error.
    #[instrument(skip(self))]
    pub async fn remove(&self, relative_path: &str) -> Result<(), AppError> {
        let path = self.resolve(relative_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(relative_path);
        let escapes_root = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes_root {
            warn!("Rejected storage path {}", relative_path);
            return Err(AppError::bad_request("Invalid file path"));
        }
        Ok(self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(root: &Path, max: u64) -> FileStorage {
        FileStorage::new(&StorageSettings {
            upload_path: root.to_path_buf(),
            max_file_size: max,
        })
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(file_extension("Report.PDF"), ".pdf");
        assert_eq!(file_extension("archive.tar.zip"), ".zip");
        assert_eq!(file_extension("README"), "");
    }

    #[test]
    fn validate_rejects_disallowed_extension_and_sizes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(dir.path(), 10);

        assert!(storage.validate("ok.txt", 5).is_ok());
        assert_eq!(
            storage.validate("script.exe", 5).unwrap_err().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            storage.validate("empty.txt", 0).unwrap_err().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            storage.validate("big.txt", 11).unwrap_err().status(),
            axum::http::StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[tokio::test]
    async fn save_writes_into_year_month_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(dir.path(), 1024);

        let stored = storage.save("notes.TXT", b"hello").await.expect("save");
        let year_month = Utc::now().format("%Y-%m").to_string();

        assert!(stored.relative_path.starts_with(&format!("{}/", year_month)));
        assert!(stored.relative_path.ends_with(".txt"));
        assert_eq!(stored.size, 5);
        assert_eq!(
            storage.read(&stored.relative_path).await.expect("read"),
            Some(b"hello".to_vec())
        );
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(dir.path(), 1024);
        let stored = storage.save("a.pdf", b"%PDF").await.expect("save");

        storage.remove(&stored.relative_path).await.expect("first remove");
        storage.remove(&stored.relative_path).await.expect("second remove");
        assert_eq!(storage.read(&stored.relative_path).await.expect("read"), None);
    }

    #[tokio::test]
    async fn resolve_rejects_parent_components() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage(dir.path(), 1024);
        assert!(storage.read("../etc/passwd").await.is_err());
    }
}
