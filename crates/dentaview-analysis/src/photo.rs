// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photo I/O: decoding encoded photos into RGBA buffers and encoding results
// back to PNG/JPEG via the `image` crate.

use std::path::Path;

use dentaview_core::error::Result;
use dentaview_core::{DentaviewError, ImageBuffer};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, info, instrument};

/// Convert a decoded `image` RGBA image into an [`ImageBuffer`].
pub fn from_rgba_image(rgba: RgbaImage) -> Result<ImageBuffer> {
    let (width, height) = rgba.dimensions();
    ImageBuffer::new(width, height, rgba.into_raw())
}

pub fn to_rgba_image(img: &ImageBuffer) -> Result<RgbaImage> {
    RgbaImage::from_raw(img.width(), img.height(), img.data().to_vec()).ok_or_else(|| {
        DentaviewError::InvalidImage(format!(
            "{}x{} buffer does not hold {} bytes",
            img.width(),
            img.height(),
            img.pixel_count() * ImageBuffer::CHANNELS
        ))
    })
}

/// Decode a photo from encoded bytes (JPEG, PNG, ...).
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<ImageBuffer> {
    let img = image::load_from_memory(data)
        .map_err(|err| DentaviewError::ImageError(format!("failed to decode image: {err}")))?;
    debug!(width = img.width(), height = img.height(), "Photo decoded from bytes");
    from_rgba_image(img.to_rgba8())
}

/// Load a photo from disk.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open(path: impl AsRef<Path>) -> Result<ImageBuffer> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| {
        DentaviewError::ImageError(format!("failed to open {}: {err}", path.display()))
    })?;
    info!(width = img.width(), height = img.height(), "Photo loaded");
    from_rgba_image(img.to_rgba8())
}

pub fn to_png_bytes(img: &ImageBuffer) -> Result<Vec<u8>> {
    let rgba = to_rgba_image(img)?;
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| DentaviewError::ImageError(format!("PNG encoding failed: {err}")))?;
    Ok(buffer)
}

/// JPEG has no alpha channel; alpha is dropped. `quality` is 1-100.
pub fn to_jpeg_bytes(img: &ImageBuffer, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(to_rgba_image(img)?).to_rgb8();
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| DentaviewError::ImageError(format!("JPEG encoding failed: {err}")))?;
    Ok(buffer)
}

/// Write the photo to disk; the format follows the file extension.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save(img: &ImageBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let rgba = to_rgba_image(img)?;
    let dynamic = if is_jpeg_path(path) {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(rgba)
    };
    dynamic.save(path).map_err(|err| {
        DentaviewError::ImageError(format!("failed to save image to {}: {err}", path.display()))
    })?;
    info!("Photo saved");
    Ok(())
}

fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}
