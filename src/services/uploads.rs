//! Multipart image upload into a storage bucket

use crate::core::{AppError, AppState, Session};
use crate::storage::{MAX_UPLOAD_BYTES, StoredObject, validate_bucket, validate_upload};
use axum::{
    Extension,
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Field carrying the file in the multipart body
const FILE_FIELD: &str = "file";

#[instrument(skip(state, session, multipart), fields(user_id = session.user_id))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredObject>), AppError> {
    validate_bucket(&bucket)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request("Malformed multipart body").with_details(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!(name = ?field.name(), "Skipping multipart field");
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        let bytes = field.bytes().await.map_err(|e| {
            warn!("Failed to read upload: {}", e.body_text());
            AppError::payload_too_large("File exceeds the 5 MB limit")
        })?;

        // size and type are checked before anything touches the store
        validate_upload(bytes.len(), &content_type)?;

        let stored = state.store.put(&bucket, bytes.to_vec(), &content_type).await?;
        info!(path = %stored.path, size = stored.size, "File uploaded");
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(AppError::bad_request("Missing file field").with_details(format!(
        "Send the image in a multipart field named '{FILE_FIELD}' (max {} bytes)",
        MAX_UPLOAD_BYTES
    )))
}
