//! Photo ingestion
//!
//! validate content type → derive filename → decode + resize → blob write.
//! The blob write always completes before the caller persists the store
//! that references it.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

use super::blob::BlobStore;
use crate::core::Config;
use crate::utils::{AppError, AppResult, ErrorCode};

/// JPEG quality for stored photos
const JPEG_QUALITY: u8 = 85;

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Declared MIME type, e.g. `image/jpeg`
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

/// Result of a successful ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Blob key, also the value stored in `Store.photo`
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub size: usize,
}

/// Accepted declared type: the encoder to use and the filename extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoType {
    pub format: ImageFormat,
    pub extension: String,
}

/// Check a declared content type.
///
/// Parameters are ignored (`image/png; charset=x` is `image/png`). Anything
/// that is not `image/*`, or an image subtype we cannot encode, is rejected.
pub fn parse_content_type(content_type: &str) -> AppResult<PhotoType> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let Some(subtype) = essence.strip_prefix("image/") else {
        return Err(AppError::unsupported_media(content_type));
    };

    let format = match subtype {
        "jpeg" | "jpg" | "pjpeg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
        "webp" => ImageFormat::WebP,
        _ => return Err(AppError::unsupported_media(content_type)),
    };

    Ok(PhotoType {
        format,
        extension: subtype.to_string(),
    })
}

/// `<uuid-v4>.<extension>`
pub fn photo_filename(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Target size for an image of `width` x `height`.
///
/// Only images wider than `max_width` shrink; height keeps the aspect ratio
/// and never drops below 1.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled = (f64::from(height) * f64::from(max_width) / f64::from(width)).round() as u32;
    (max_width, scaled.max(1))
}

/// Decode, shrink to `max_width` and re-encode as `format`.
///
/// CPU bound; run it on the blocking pool.
pub fn process_image(
    data: &[u8],
    format: ImageFormat,
    max_width: u32,
) -> AppResult<(Vec<u8>, u32, u32)> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImage, format!("Invalid image: {}", e))
    })?;

    let (width, height) = img.dimensions();
    let (target_w, target_h) = target_dimensions(width, height, max_width);
    let img = if (target_w, target_h) != (width, height) {
        img.resize_exact(target_w, target_h, FilterType::Lanczos3)
    } else {
        img
    };

    let encoded = encode(&img, format)?;
    Ok((encoded, target_w, target_h))
}

fn encode(img: &DynamicImage, format: ImageFormat) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let failed = |e: image::ImageError| AppError::internal(format!("Failed to encode image: {}", e));

    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
            img.to_rgb8().write_with_encoder(encoder).map_err(failed)?;
        }
        ImageFormat::WebP => {
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut cursor, ImageFormat::WebP)
                .map_err(failed)?;
        }
        other => {
            img.write_to(&mut cursor, other).map_err(failed)?;
        }
    }

    Ok(buffer)
}

/// Runs uploads through validation, resizing and the blob store
#[derive(Clone)]
pub struct PhotoIngestor {
    blobs: Arc<dyn BlobStore>,
    max_width: u32,
    max_bytes: usize,
}

impl PhotoIngestor {
    pub fn new(blobs: Arc<dyn BlobStore>, max_width: u32, max_bytes: usize) -> Self {
        Self {
            blobs,
            max_width,
            max_bytes,
        }
    }

    pub fn from_config(blobs: Arc<dyn BlobStore>, config: &Config) -> Self {
        Self::new(blobs, config.photo_max_width, config.max_upload_bytes)
    }

    /// Ingest an optional upload.
    ///
    /// `None` (or an empty payload) is a no-op. On success the blob has been
    /// written and its key is returned.
    pub async fn ingest(&self, upload: Option<PhotoUpload>) -> AppResult<Option<StoredPhoto>> {
        let Some(upload) = upload.filter(|u| !u.bytes.is_empty()) else {
            return Ok(None);
        };

        let photo_type = parse_content_type(&upload.content_type)?;

        if upload.bytes.len() > self.max_bytes {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!(
                    "File too large. Maximum size is {} bytes ({}MB)",
                    self.max_bytes,
                    self.max_bytes / 1024 / 1024
                ),
            )
            .with_detail("size", upload.bytes.len()));
        }

        let key = photo_filename(&photo_type.extension);
        let max_width = self.max_width;
        let format = photo_type.format;
        let data = upload.bytes;

        let (encoded, width, height) =
            tokio::task::spawn_blocking(move || process_image(&data, format, max_width))
                .await
                .map_err(|e| {
                    tracing::error!("spawn_blocking join error: {e}");
                    AppError::internal(format!("Image processing task failed: {}", e))
                })??;

        let size = encoded.len();
        self.blobs.write(&key, encoded).await?;

        tracing::info!(
            original_name = upload.file_name.as_deref().unwrap_or(""),
            key = %key,
            width,
            height,
            size,
            "Photo ingested"
        );

        Ok(Some(StoredPhoto {
            key,
            width,
            height,
            size,
        }))
    }
}
