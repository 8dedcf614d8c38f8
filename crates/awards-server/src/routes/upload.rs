//! Image upload for nominee artwork.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads::{StoredUpload, UploadError, allowed_file};

/// Store the multipart `file` field.
///
/// The file name is checked before the bearer token, so a disallowed type is
/// rejected with 400 whether or not the caller is signed in.
pub async fn upload(
    State(state): State<AppState>,
    auth: Result<AdminAuth, ApiError>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StoredUpload>, ApiError> {
    let mut multipart = multipart?;

    let stored = loop {
        let Some(field) = multipart.next_field().await? else {
            return Err(UploadError::NoFile.into());
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.trim().is_empty() {
            return Err(UploadError::EmptyFilename.into());
        }
        if !allowed_file(&filename) {
            return Err(UploadError::DisallowedType.into());
        }

        let admin = auth?;
        let bytes = field.bytes().await?;
        let stored = state.uploads.save(&filename, &bytes).await?;
        tracing::info!(
            admin = %admin.username(),
            filename = %stored.filename,
            size = bytes.len(),
            "Image uploaded"
        );
        break stored;
    };

    Ok(Json(stored))
}
