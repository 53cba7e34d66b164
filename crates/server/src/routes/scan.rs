//! Scan route handler.
//!
//! Accepts multipart image uploads and runs the scan pipeline. Guests are
//! allowed; they get an ephemeral result that was never persisted.

use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{ScanImage, ScanOutcome};
use crate::services::ScanService;
use crate::state::AppState;

/// Run the scan pipeline on the uploaded images.
///
/// Accepts the repeatable `images` field, or the legacy single `image`
/// field from older clients. Field order is preserved; the first image is
/// the one kept for display.
pub async fn scan(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    multipart: Multipart,
) -> Result<Response> {
    let images = collect_images(multipart).await?;

    let outcome = ScanService::new(state.pool(), state.gemini(), state.media())
        .scan(images, user.map(|u| u.id))
        .await?;

    Ok(match outcome {
        ScanOutcome::Saved(item) => Json(item).into_response(),
        ScanOutcome::Ephemeral(result) => Json(result).into_response(),
    })
}

/// Read image parts out of the multipart body.
///
/// Each part keeps the content type its sender declared; parts without one
/// are assumed JPEG, by far the common case for camera uploads.
async fn collect_images(mut multipart: Multipart) -> Result<Vec<ScanImage>> {
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("images" | "image") => {
                // bytes() consumes the field; read the content type first
                let mime_type = field.content_type().unwrap_or("image/jpeg").to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                if !bytes.is_empty() {
                    images.push(ScanImage::new(bytes.to_vec(), mime_type));
                }
            }
            _ => {
                // Unknown fields are ignored rather than rejected
            }
        }
    }

    Ok(images)
}
