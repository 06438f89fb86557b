// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scan image loading and validation for the diagnostic endpoints

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Maximum accepted upload size (20MB). DICOM exports and high resolution
/// radiographs run large, so this is double the usual web upload cap.
pub const MAX_SCAN_SIZE: usize = 20 * 1024 * 1024;

/// Errors raised while validating and decoding an uploaded scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported scan format")]
    UnsupportedFormat,

    #[error("Failed to decode scan: {0}")]
    DecodeFailed(String),

    #[error("Scan data is empty")]
    EmptyData,
}

/// Metadata extracted while decoding a scan
#[derive(Debug, Clone)]
pub struct ScanInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected container format
    pub format: ImageFormat,
    /// Upload size in bytes
    pub size_bytes: usize,
}

/// Decode raw scan bytes from a multipart upload
///
/// # Arguments
/// * `bytes` - Raw image bytes as received from the `file` field
///
/// # Returns
/// * `Ok((DynamicImage, ScanInfo))` - The decoded pixels and metadata
/// * `Err(ScanError)` - If validation or decoding fails
pub fn decode_scan(bytes: &[u8]) -> Result<(DynamicImage, ScanInfo), ScanError> {
    if bytes.is_empty() {
        return Err(ScanError::EmptyData);
    }

    if bytes.len() > MAX_SCAN_SIZE {
        return Err(ScanError::TooLarge(bytes.len(), MAX_SCAN_SIZE));
    }

    // Detect format from magic bytes
    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ScanError::DecodeFailed(e.to_string()))?;

    let info = ScanInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Detect the container format of a scan from its magic bytes
///
/// Radiograph exports arrive as PNG, JPEG, WebP, BMP or TIFF. Anything
/// else (including animated formats) is rejected.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ScanError> {
    if bytes.len() < 4 {
        return Err(ScanError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ScanError::UnsupportedFormat),
    }
}

/// File extension for a detected format, used when an upload carries no
/// usable filename of its own
pub fn format_to_extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        _ => "bin",
    }
}
