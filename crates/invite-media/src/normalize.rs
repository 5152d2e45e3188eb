//! Photo normalization before upload.
//!
//! Decodes an arbitrary image, downscales it to a maximum width while
//! keeping its aspect ratio, and re-encodes it as JPEG. EXIF orientation is
//! applied first, so limits hold against the displayed width.

use std::io::Cursor;
use std::path::Path;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use tracing::debug;

use crate::artifact::{ArtifactFormat, EncodedImageArtifact};
use crate::surface::Surface;
use crate::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH, MediaError, Result};

/// Tuning for [`normalize_bytes`] and [`normalize_file`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    /// Widest output allowed, in pixels. Narrower images are never upscaled.
    pub max_width: u32,
    /// JPEG quality on a 0–1 scale.
    pub quality: f32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl NormalizeOptions {
    pub fn with_max_width(max_width: u32) -> Self {
        Self {
            max_width,
            ..Self::default()
        }
    }
}

/// Output size for a `width`x`height` image limited to `max_width`.
///
/// Height is derived from the same scale factor as width and never drops
/// below one pixel.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let ratio = f64::from(max_width) / f64::from(width);
    let new_height = (f64::from(height) * ratio).round() as u32;
    (max_width, new_height.max(1))
}

/// Decode `bytes` and rotate/flip them upright per their EXIF orientation.
fn decode_upright(bytes: &[u8]) -> Result<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()
        .map_err(MediaError::Decode)?;
    let orientation = decoder.orientation().unwrap_or_else(|e| {
        debug!(error = %e, "Unreadable orientation metadata, assuming upright");
        Orientation::NoTransforms
    });

    let mut img = DynamicImage::from_decoder(decoder).map_err(MediaError::Decode)?;
    if orientation != Orientation::NoTransforms {
        debug!(?orientation, "Applying EXIF orientation");
        img.apply_orientation(orientation);
    }
    Ok(img)
}

/// Normalize an in-memory image file.
pub fn normalize_bytes(bytes: &[u8], options: &NormalizeOptions) -> Result<EncodedImageArtifact> {
    let img = decode_upright(bytes)?;
    let (orig_w, orig_h) = (img.width(), img.height());
    let (width, height) = target_dimensions(orig_w, orig_h, options.max_width);

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Normalizing image"
    );

    let mut surface = Surface::acquire(width, height)?;
    surface.draw_image_scaled(&img);
    surface.encode(ArtifactFormat::Jpeg, Some(options.quality))
}

/// Read and normalize an image file.
///
/// Decoding and encoding run on the blocking pool.
pub async fn normalize_file(
    path: impl AsRef<Path>,
    options: &NormalizeOptions,
) -> Result<EncodedImageArtifact> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), len = bytes.len(), "Read image file");

    let options = *options;
    tokio::task::spawn_blocking(move || normalize_bytes(&bytes, &options)).await?
}
