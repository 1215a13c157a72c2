//! Image payload decoding and validation.
//!
//! Recipe images and avatars arrive as `data:<mime>;base64,<payload>` strings.
//! The declared mime type is ignored; the stored content type is detected from
//! the decoded bytes.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, ImageReader};

use crate::error::ImageError;

/// Allowed image formats for recipe images and avatars.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded image size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    /// Detected content type (e.g., "image/png").
    pub content_type: String,
}

/// Decode and validate a `data:<mime>;base64,<payload>` string.
pub fn decode_data_uri(value: &str) -> Result<DecodedImage, ImageError> {
    let rest = value
        .trim()
        .strip_prefix("data:")
        .ok_or(ImageError::NotDataUri)?;
    let (_declared_mime, payload) = rest.split_once(";base64,").ok_or(ImageError::NotDataUri)?;

    // A payload larger than this cannot decode to something within the limit.
    if payload.len() > MAX_FILE_SIZE / 3 * 4 + 4 {
        return Err(ImageError::TooLarge {
            size: payload.len() / 4 * 3,
            max: MAX_FILE_SIZE,
        });
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| ImageError::InvalidBase64)?;

    let content_type = validate_image(&data)?;
    Ok(DecodedImage { data, content_type })
}

/// Validate raw image bytes: size within limits and format allowed.
///
/// Returns the detected content type on success.
pub fn validate_image(data: &[u8]) -> Result<String, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Empty);
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let format = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|_| ImageError::UnknownFormat)?
        .format()
        .ok_or(ImageError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
    }

    Ok(format.to_mime_type().to_string())
}
