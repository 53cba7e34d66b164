//! Scan orchestrator: turn 1..N photos of one physical item into a
//! persisted or ephemeral inventory record.
//!
//! Pipeline: preprocess all images in parallel, upload the first one for
//! display, recognize against the vision model, parse defensively, then
//! either persist for the authenticated owner or hand back an ephemeral
//! result for a guest. Preprocessing and upload degrade gracefully;
//! recognition and parse failures abort the whole operation with nothing
//! persisted.

mod parse;
mod preprocess;

pub use parse::{Recognition, parse_recognition};
pub use preprocess::preprocess_all;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use freshtrack_core::{ItemId, KNOWN_CATEGORIES, UserId, normalize_category};

use crate::db::RepositoryError;
use crate::db::items::{ItemRepository, NewItem};
use crate::models::{ScanImage, ScanOutcome, ScanResult};
use crate::services::gemini::{GeminiClient, GeminiError};
use crate::services::media::MediaStore;

/// Most images accepted per scan. Recognition benefits from a couple of
/// angles (label + date stamp); more than this adds payload, not accuracy.
pub const MAX_SCAN_IMAGES: usize = 3;

/// Days until expiry assumed when the model gives none.
const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Errors from the scan pipeline.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No image parts were supplied.
    #[error("no image provided")]
    NoImages,

    /// More images than the pipeline accepts.
    #[error("too many images (max {max})")]
    TooManyImages {
        /// The limit that was exceeded.
        max: usize,
    },

    /// The vision provider is not configured; scanning is unavailable.
    #[error("vision provider not configured")]
    ProviderNotConfigured,

    /// The vision model call failed.
    #[error("recognition failed: {0}")]
    Recognition(#[from] GeminiError),

    /// The model responded, but no usable item could be extracted.
    #[error("unrecognized response: {0}")]
    UnrecognizedResponse(String),

    /// Persisting the recognized item failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Scan pipeline orchestrator.
pub struct ScanService<'a> {
    items: ItemRepository<'a>,
    gemini: Option<&'a GeminiClient>,
    media: Option<&'a MediaStore>,
}

impl<'a> ScanService<'a> {
    /// Create a new scan service.
    ///
    /// `gemini` is required for any scan to succeed; `media` is optional
    /// and its absence only means items carry no image URL.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        gemini: Option<&'a GeminiClient>,
        media: Option<&'a MediaStore>,
    ) -> Self {
        Self {
            items: ItemRepository::new(pool),
            gemini,
            media,
        }
    }

    /// Run the full pipeline on the supplied images.
    ///
    /// With an owner, the recognized item is persisted and returned as
    /// [`ScanOutcome::Saved`]. Without one, nothing is written and the
    /// caller gets [`ScanOutcome::Ephemeral`].
    ///
    /// # Errors
    ///
    /// Returns `ScanError::NoImages`/`TooManyImages` on bad input,
    /// `ProviderNotConfigured` when scanning is unavailable, and
    /// `Recognition`/`UnrecognizedResponse` when the model fails or
    /// answers with nothing usable. No item is persisted on any error.
    #[instrument(skip(self, images), fields(images = images.len(), guest = owner.is_none()))]
    pub async fn scan(
        &self,
        images: Vec<ScanImage>,
        owner: Option<UserId>,
    ) -> Result<ScanOutcome, ScanError> {
        if images.is_empty() {
            return Err(ScanError::NoImages);
        }
        if images.len() > MAX_SCAN_IMAGES {
            return Err(ScanError::TooManyImages {
                max: MAX_SCAN_IMAGES,
            });
        }
        let gemini = self.gemini.ok_or(ScanError::ProviderNotConfigured)?;

        let processed = preprocess_all(images).await;

        // Only the first image is kept for display; failure means no URL,
        // never a failed scan.
        let image_url = match self.media {
            Some(media) => media.try_upload_item_image(processed[0].clone()).await,
            None => None,
        };

        let raw = gemini
            .generate_from_images(&recognition_prompt(), &processed)
            .await?;

        let recognition = parse_recognition(&raw).ok_or_else(|| {
            ScanError::UnrecognizedResponse("no item could be identified".to_string())
        })?;

        let category = normalize_category(recognition.category.as_deref());
        let expiry_date = Utc::now() + Duration::days(resolve_expiry_days(recognition.days_to_expire));

        match owner {
            Some(owner_id) => {
                let item = self
                    .items
                    .create(
                        NewItem {
                            name: recognition.name,
                            category,
                            quantity: 1,
                            expiry_date: Some(expiry_date),
                            image_url,
                        },
                        owner_id,
                    )
                    .await?;

                tracing::info!(item_id = %item.id, "Scan persisted");
                Ok(ScanOutcome::Saved(item))
            }
            None => Ok(ScanOutcome::Ephemeral(ScanResult {
                id: ItemId::EPHEMERAL,
                name: recognition.name,
                category,
                expiry_date,
                image_url,
                found_expiry_date: recognition.found_expiry_date,
                is_guest: true,
            })),
        }
    }
}

/// Days until expiry: the model's estimate, or the default when absent
/// or zero ("I don't know" answers tend to come back as 0).
const fn resolve_expiry_days(days: Option<i64>) -> i64 {
    match days {
        Some(d) if d != 0 => d,
        _ => DEFAULT_EXPIRY_DAYS,
    }
}

/// Build the single-turn recognition instruction.
fn recognition_prompt() -> String {
    format!(
        "You are looking at one or more photos of a single grocery or household item. \
         Identify the item and respond with ONLY a JSON object, no markdown, no prose, \
         in exactly this shape: \
         {{\"name\": string, \"category\": string, \"daysToExpire\": number, \"foundExpiryDate\": boolean}}. \
         Pick the category from this list: {}. \
         If a best-before or expiry date is visible anywhere on the packaging, use it to \
         compute daysToExpire from today and set foundExpiryDate to true. Otherwise \
         estimate a typical shelf life in days and set foundExpiryDate to false.",
        KNOWN_CATEGORIES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_expiry_days_default() {
        assert_eq!(resolve_expiry_days(None), 7);
        assert_eq!(resolve_expiry_days(Some(0)), 7);
    }

    #[test]
    fn test_resolve_expiry_days_passthrough() {
        assert_eq!(resolve_expiry_days(Some(5)), 5);
        assert_eq!(resolve_expiry_days(Some(-2)), -2);
    }

    #[test]
    fn test_prompt_lists_all_categories() {
        let prompt = recognition_prompt();
        for category in KNOWN_CATEGORIES {
            assert!(prompt.contains(category), "missing category {category}");
        }
        assert!(prompt.contains("daysToExpire"));
        assert!(prompt.contains("foundExpiryDate"));
    }
}
