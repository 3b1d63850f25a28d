//! Image upload routes.
//!
//! Multipart uploads, image MIME types only, capped at the configured
//! size (5 MB by default). Files are written to the uploads directory and
//! served back at `/uploads/...`.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Response after a successful upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UploadResponse {
    pub message: String,
    /// Path the uploaded image is served from.
    pub image_url: String,
}

/// An accepted image payload.
struct ImagePayload {
    extension: &'static str,
    data: Vec<u8>,
}

/// Upload an event image.
///
/// POST /api/v1/uploads/event-image
pub async fn upload_event_image(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let payload = read_image_field(multipart, state.config.uploads.max_file_bytes).await?;
    let image_url = store_image(&state, "event", payload).await?;

    info!(user_id = %current_user.user_id, image_url = %image_url, "Event image uploaded");

    Ok(Json(UploadResponse {
        message: "Image uploaded successfully".to_string(),
        image_url,
    }))
}

/// Upload a profile picture, replacing any previously stored one.
///
/// POST /api/v1/uploads/profile-picture
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let payload = read_image_field(multipart, state.config.uploads.max_file_bytes).await?;

    let user_repo = UserRepository::new(state.pool.clone());
    let old_url = user_repo
        .find_by_id(current_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?
        .profile_picture_url;

    let image_url = store_image(&state, "profile", payload).await?;

    user_repo
        .update_profile_picture(current_user.user_id, &image_url)
        .await?;

    // Remove the previous picture from disk. Best-effort: the new picture
    // is already stored and referenced.
    if let Some(old_url) = old_url {
        if let Some(filename) = old_url.strip_prefix("/uploads/") {
            let path = std::path::Path::new(&state.config.uploads.dir).join(filename);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), "Failed to remove old profile picture: {}", e);
            }
        }
    }

    info!(user_id = %current_user.user_id, image_url = %image_url, "Profile picture uploaded");

    Ok(Json(UploadResponse {
        message: "Profile picture uploaded successfully".to_string(),
        image_url,
    }))
}

/// Pull the image field out of a multipart request, enforcing MIME type
/// and size limits.
async fn read_image_field(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<ImagePayload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|c| c.to_string())
            .unwrap_or_default();
        let extension = extension_for(&content_type)
            .ok_or_else(|| ApiError::Validation("Only image files are allowed".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

        if data.len() > max_file_bytes {
            return Err(ApiError::Validation(format!(
                "File too large. Maximum size is {}MB.",
                max_file_bytes / (1024 * 1024)
            )));
        }

        return Ok(ImagePayload {
            extension,
            data: data.to_vec(),
        });
    }

    Err(ApiError::Validation("No file uploaded".to_string()))
}

/// Write an image to the uploads directory and return its public path.
async fn store_image(
    state: &AppState,
    prefix: &str,
    payload: ImagePayload,
) -> Result<String, ApiError> {
    let filename = format!("{}-{}.{}", prefix, Uuid::new_v4(), payload.extension);
    let path = std::path::Path::new(&state.config.uploads.dir).join(&filename);

    tokio::fs::create_dir_all(&state.config.uploads.dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create uploads directory: {}", e)))?;

    tokio::fs::write(&path, &payload.data)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;

    Ok(format!("/uploads/{}", filename))
}

/// Map an image MIME type to a file extension; `None` rejects the upload.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
