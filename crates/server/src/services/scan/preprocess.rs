//! Image preprocessing for the scan pipeline.
//!
//! Every uploaded image is decoded, shrunk to fit a fixed bounding box
//! without upscaling, and re-encoded as JPEG. Decoding and encoding are
//! CPU work, so each image runs on the blocking pool; the batch is joined
//! before the pipeline proceeds. The original stays on this side of the
//! task boundary, so any per-image failure degrades to the unprocessed
//! upload under its declared content type.

use std::io::Cursor;

use futures::future::join_all;
use image::{ImageError, ImageReader, codecs::jpeg::JpegEncoder};
use tokio::task::JoinError;

use crate::models::ScanImage;

/// Longest allowed edge of a processed image.
const MAX_DIMENSION: u32 = 400;

/// JPEG quality for re-encoding.
const JPEG_QUALITY: u8 = 80;

/// Preprocess a batch of images concurrently, preserving order.
///
/// Per-image failures never abort the batch; see [`fallback`].
pub async fn preprocess_all(images: Vec<ScanImage>) -> Vec<ScanImage> {
    let tasks: Vec<_> = images
        .iter()
        .map(|image| {
            let bytes = image.bytes.clone();
            tokio::task::spawn_blocking(move || preprocess(&bytes))
        })
        .collect();

    let joined = join_all(tasks).await;

    images
        .into_iter()
        .zip(joined)
        .map(|(original, result)| recover(original, result))
        .collect()
}

/// Unwrap a joined preprocessing task, keeping the original on a panic.
fn recover(
    original: ScanImage,
    joined: Result<Result<Vec<u8>, ImageError>, JoinError>,
) -> ScanImage {
    match joined {
        Ok(processed) => fallback(original, processed),
        Err(e) => {
            tracing::error!(error = %e, "Preprocess task panicked, using original bytes");
            original
        }
    }
}

/// Decide what to submit for an image whose preprocessing may have failed.
///
/// Successful output is always JPEG; failed preprocessing falls back to
/// the original bytes under their declared content type. The vision model
/// handles most formats anyway, just less efficiently.
fn fallback(original: ScanImage, processed: Result<Vec<u8>, ImageError>) -> ScanImage {
    match processed {
        Ok(bytes) => ScanImage::jpeg(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "Image preprocessing failed, using original bytes");
            original
        }
    }
}

/// Decode, shrink to fit `MAX_DIMENSION`, and re-encode as JPEG.
fn preprocess(bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    // thumbnail() never upscales and keeps aspect ratio
    let resized = if decoded.width() > MAX_DIMENSION || decoded.height() > MAX_DIMENSION {
        decoded.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        decoded
    };

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    resized.to_rgb8().write_with_encoder(encoder)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 180, 90]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode");
        out.into_inner()
    }

    fn decode(bytes: &[u8]) -> DynamicImage {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .expect("guess format")
            .decode()
            .expect("decode")
    }

    #[test]
    fn test_preprocess_shrinks_large_images() {
        let processed = preprocess(&png_bytes(800, 600)).expect("preprocess");
        let img = decode(&processed);
        assert!(img.width() <= MAX_DIMENSION);
        assert!(img.height() <= MAX_DIMENSION);
        // Aspect ratio preserved
        assert_eq!(img.width(), 400);
        assert_eq!(img.height(), 300);
    }

    #[test]
    fn test_preprocess_never_upscales() {
        let processed = preprocess(&png_bytes(100, 80)).expect("preprocess");
        let img = decode(&processed);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 80);
    }

    #[test]
    fn test_preprocess_outputs_jpeg() {
        let processed = preprocess(&png_bytes(10, 10)).expect("preprocess");
        // JPEG SOI marker
        assert_eq!(&processed[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_fallback_keeps_original_bytes_and_type() {
        let original = ScanImage::new(b"not an image".to_vec(), "image/webp");
        let err = preprocess(&original.bytes).expect_err("garbage should fail");
        assert_eq!(fallback(original.clone(), Err(err)), original);
    }

    #[test]
    fn test_fallback_relabels_processed_output_as_jpeg() {
        let original = ScanImage::new(b"original".to_vec(), "image/png");
        let result = fallback(original, Ok(b"processed".to_vec()));
        assert_eq!(result.bytes, b"processed".to_vec());
        assert_eq!(result.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_recover_keeps_original_when_task_panics() {
        let original = ScanImage::new(b"bytes".to_vec(), "image/png");
        let joined =
            tokio::task::spawn_blocking(|| -> Result<Vec<u8>, ImageError> { panic!("decoder bug") })
                .await;
        assert!(joined.is_err());
        assert_eq!(recover(original.clone(), joined), original);
    }

    #[tokio::test]
    async fn test_preprocess_all_preserves_order_and_length() {
        let good = ScanImage::new(png_bytes(500, 500), "image/png");
        let bad = ScanImage::new(b"garbage".to_vec(), "image/webp");
        let results = preprocess_all(vec![good, bad.clone()]).await;

        assert_eq!(results.len(), 2);
        // First image processed to JPEG, second fell back to the original
        // bytes under the type the sender declared
        assert_eq!(&results[0].bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(results[0].mime_type, "image/jpeg");
        assert_eq!(results[1], bad);
    }
}
