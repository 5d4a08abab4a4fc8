/// Upload and export file stores
///
/// Two flat directories hold the application's durable files: uploaded
/// data files and exported chart images. Both roots are injected through
/// [`crate::config::StorageConfig`] and created before the server starts
/// accepting requests, so there is no global mutable state here, just a
/// pair of paths.
///
/// Every name that reaches the filesystem goes through
/// `sanitize_filename::sanitize`, which strips directory separators and
/// traversal sequences, so a stored name can never escape its root.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use tracing::debug;

use chartlab_shared::table::loader::is_supported_extension;

use crate::config::StorageConfig;

/// Failures in the upload/export stores
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Uploaded filename has an extension outside the allow-list
    #[error("unsupported file type: {0}")]
    UnsupportedExtension(String),

    /// Data URI lacks the `<media-type>,<payload>` comma separator
    #[error("dataURL missing comma separator")]
    MissingSeparator,

    /// Payload after the comma is not valid base64
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Underlying filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle on the upload and export directories
#[derive(Debug, Clone)]
pub struct FileStore {
    upload_root: PathBuf,
    export_root: PathBuf,
}

impl FileStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_root: config.upload_dir.clone(),
            export_root: config.export_dir.clone(),
        }
    }

    /// Creates both roots if they do not exist yet; called once at startup
    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.upload_root)?;
        fs::create_dir_all(&self.export_root)?;
        Ok(())
    }

    /// Root directory of uploaded data files (served read-only at /uploads)
    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    /// Root directory of exported images (served read-only at /exports)
    pub fn export_root(&self) -> &Path {
        &self.export_root
    }

    /// Stores an uploaded data file under a generated name
    ///
    /// The stored name is `YYYYmmddHHMMSS_<sanitized original>`, which
    /// keeps listings chronological and sidesteps collisions between
    /// users uploading files with the same name.
    ///
    /// # Errors
    ///
    /// `UnsupportedExtension` unless the original name ends in
    /// csv/xls/xlsx; `Io` if the write fails.
    pub fn store_upload(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        if !is_supported_extension(original_name) {
            return Err(StorageError::UnsupportedExtension(
                original_name.to_string(),
            ));
        }

        let stored_name = format!(
            "{}_{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            sanitize_filename::sanitize(original_name)
        );
        let path = self.upload_root.join(&stored_name);
        fs::write(&path, bytes)?;

        debug!("Stored upload {} ({} bytes)", stored_name, bytes.len());
        Ok(stored_name)
    }

    /// Resolves a stored upload name to its path inside the upload root
    ///
    /// The name is re-sanitized before joining, so values taken straight
    /// from client requests cannot traverse out of the root.
    pub fn upload_path(&self, stored_name: &str) -> PathBuf {
        self.upload_root
            .join(sanitize_filename::sanitize(stored_name))
    }

    /// Whether a previously uploaded file with this stored name exists
    pub fn upload_exists(&self, stored_name: &str) -> bool {
        self.upload_path(stored_name).is_file()
    }

    /// Decodes a data-URI-style image payload and writes it to the export
    /// root, returning the retrieval path (`/exports/<name>`)
    ///
    /// Input looks like `data:image/png;base64,iVBORw0...`: everything up
    /// to the first comma is the media-type prefix and is discarded, the
    /// rest is the base64 payload.
    ///
    /// # Errors
    ///
    /// `MissingSeparator` without a comma, `InvalidBase64` if the payload
    /// does not decode, `Io` if the write fails.
    pub fn save_export(
        &self,
        name: Option<String>,
        data_url: &str,
    ) -> Result<String, StorageError> {
        let (_prefix, payload) = data_url
            .split_once(',')
            .ok_or(StorageError::MissingSeparator)?;

        let bytes = BASE64.decode(payload)?;

        let name =
            name.unwrap_or_else(|| format!("chart_{}.png", Utc::now().format("%Y%m%d%H%M%S")));
        let mut safe_name = sanitize_filename::sanitize(&name);
        if safe_name.is_empty() {
            safe_name = format!("chart_{}.png", Utc::now().format("%Y%m%d%H%M%S"));
        }

        let path = self.export_root.join(&safe_name);
        fs::write(&path, &bytes)?;

        debug!("Stored export {} ({} bytes)", safe_name, bytes.len());
        Ok(format!("/exports/{}", safe_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(&StorageConfig {
            upload_dir: dir.path().join("uploads"),
            export_dir: dir.path().join("exports"),
        });
        store.ensure_dirs().unwrap();
        (dir, store)
    }

    #[test]
    fn test_store_and_resolve_upload() {
        let (_dir, store) = test_store();

        let stored = store.store_upload("sales.csv", b"a,b\n1,2\n").unwrap();
        assert!(stored.ends_with("_sales.csv"));
        assert!(store.upload_exists(&stored));
        assert_eq!(
            fs::read(store.upload_path(&stored)).unwrap(),
            b"a,b\n1,2\n".to_vec()
        );
    }

    #[test]
    fn test_upload_rejects_unknown_extension() {
        let (_dir, store) = test_store();

        assert!(matches!(
            store.store_upload("malware.exe", b"MZ"),
            Err(StorageError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_upload_path_cannot_traverse() {
        let (_dir, store) = test_store();

        let path = store.upload_path("../../etc/passwd");
        assert!(path.starts_with(store.upload_root()));
    }

    #[test]
    fn test_export_decodes_single_byte() {
        let (_dir, store) = test_store();

        // "QQ==" is base64 for the single byte 0x41 ("A")
        let url = store
            .save_export(Some("tiny.png".to_string()), "data:image/png;base64,QQ==")
            .unwrap();
        assert_eq!(url, "/exports/tiny.png");
        assert_eq!(
            fs::read(store.export_root().join("tiny.png")).unwrap(),
            vec![0x41]
        );
    }

    #[test]
    fn test_export_without_comma_is_rejected() {
        let (_dir, store) = test_store();

        assert!(matches!(
            store.save_export(None, "no separator here"),
            Err(StorageError::MissingSeparator)
        ));
    }

    #[test]
    fn test_export_with_bad_base64_is_rejected() {
        let (_dir, store) = test_store();

        assert!(matches!(
            store.save_export(None, "data:image/png;base64,@@not-base64@@"),
            Err(StorageError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_export_name_is_sanitized() {
        let (_dir, store) = test_store();

        let url = store
            .save_export(
                Some("../escape.png".to_string()),
                "data:image/png;base64,QQ==",
            )
            .unwrap();

        // The sanitized name is a single path component, so the write
        // lands inside the export root rather than its parent
        let safe_name = url.strip_prefix("/exports/").unwrap();
        assert_eq!(Path::new(safe_name).components().count(), 1);
        assert!(store.export_root().join(safe_name).is_file());
        assert!(!store.export_root().parent().unwrap().join("escape.png").exists());
    }

    #[test]
    fn test_export_default_name_generated() {
        let (_dir, store) = test_store();

        let url = store.save_export(None, "data:image/png;base64,QQ==").unwrap();
        assert!(url.starts_with("/exports/chart_"));
        assert!(url.ends_with(".png"));
    }
}
