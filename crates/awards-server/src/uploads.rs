//! Local storage for nominee images.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use awards_core::db::unix_timestamp;
use awards_core::validation::UPLOADS_PREFIX;

/// Accepted image extensions (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Largest accepted upload request body.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file part")]
    NoFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed")]
    DisallowedType,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    pub filename: String,
    pub url: String,
}

/// True when `filename` has one of [`ALLOWED_EXTENSIONS`].
pub fn allowed_file(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    })
}

fn extension_of(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

/// Reduce a client-supplied name to a safe basename.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; whitespace becomes `_`.
/// Directory components and leading dots are dropped.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Upload directory on local disk.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `bytes` under a timestamped version of `original_name`.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredUpload, UploadError> {
        if original_name.trim().is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        if !allowed_file(original_name) {
            return Err(UploadError::DisallowedType);
        }

        let safe = secure_filename(original_name);
        let (stem, ext) = safe.rsplit_once('.').ok_or(UploadError::DisallowedType)?;
        let stem = if stem.is_empty() { "upload" } else { stem };
        let filename = format!("{stem}_{}.{}", unix_timestamp(), ext.to_ascii_lowercase());

        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        debug!(%filename, size = bytes.len(), "Stored upload");

        Ok(StoredUpload {
            url: format!("{UPLOADS_PREFIX}{filename}"),
            filename,
        })
    }

    /// Path on disk for a `/uploads/{name}` URL, if it names a plain file.
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(UPLOADS_PREFIX)?;
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        Some(self.dir.join(name))
    }

    /// Delete the file behind `url`. Failures are logged, never returned.
    pub async fn remove_url(&self, url: &str) {
        let Some(path) = self.path_for_url(url) else {
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove upload"),
        }
    }
}
