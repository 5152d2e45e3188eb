//! Owned raster drawing surface shared by the normalizer and signature pad.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use tracing::debug;

use crate::artifact::{ArtifactFormat, EncodedImageArtifact};
use crate::{MediaError, Result};

/// Largest edge a surface may have.
pub const MAX_SURFACE_EDGE: u32 = 32_767;

/// Largest pixel count a surface may have (16384 x 16384).
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Fully transparent pixel; the color of an empty surface.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// An RGBA canvas. Acquired with [`Surface::acquire`], released on drop.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Acquire a transparent surface of the given size.
    ///
    /// Fails with [`MediaError::RenderSurface`] for a zero-sized request, an
    /// edge over [`MAX_SURFACE_EDGE`] or an area over [`MAX_SURFACE_AREA`].
    pub fn acquire(width: u32, height: u32) -> Result<Self> {
        let area = u64::from(width) * u64::from(height);
        if area == 0
            || width > MAX_SURFACE_EDGE
            || height > MAX_SURFACE_EDGE
            || area > MAX_SURFACE_AREA
        {
            return Err(MediaError::RenderSurface { width, height });
        }
        debug!(width, height, "Acquired drawing surface");
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Erase everything back to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Draw `img` stretched to cover the whole surface in a single pass.
    pub fn draw_image_scaled(&mut self, img: &DynamicImage) {
        let (width, height) = self.dimensions();
        if img.width() == width && img.height() == height {
            image::imageops::replace(&mut self.pixels, &img.to_rgba8(), 0, 0);
            return;
        }
        let scaled = img.resize_exact(width, height, FilterType::Lanczos3);
        image::imageops::replace(&mut self.pixels, &scaled.to_rgba8(), 0, 0);
    }

    /// Draw a line from `from` to `to` with round caps and joins.
    ///
    /// The pen tip is stamped every half pixel, so consecutive segments that
    /// share an endpoint join without gaps. The segment is clipped to the
    /// surface grown by the pen radius first; parts outside leave no ink.
    pub fn stroke_segment(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        line_width: f32,
        color: Rgba<u8>,
    ) {
        let radius = ((line_width / 2.0).floor() as i32).max(0);
        let margin = radius as f32 + 1.0;
        let bounds = (
            -margin,
            -margin,
            self.width() as f32 + margin,
            self.height() as f32 + margin,
        );
        let Some((from, to)) = clip_segment(from, to, bounds) else {
            return;
        };
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = ((dx.hypot(dy) * 2.0).ceil() as u32).max(1);

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (from.0 + dx * t).round() as i32;
            let y = (from.1 + dy * t).round() as i32;
            draw_filled_circle_mut(&mut self.pixels, (x, y), radius, color);
        }
    }

    /// Encode the current pixels into an artifact.
    ///
    /// `quality` (0–1) applies to JPEG only. JPEG output drops the alpha
    /// channel.
    pub fn encode(
        &self,
        format: ArtifactFormat,
        quality: Option<f32>,
    ) -> Result<EncodedImageArtifact> {
        let mut buf = Vec::new();
        let quality = match format {
            ArtifactFormat::Jpeg => {
                let q = quality.unwrap_or(crate::DEFAULT_JPEG_QUALITY);
                let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality_percent(q));
                DynamicImage::ImageRgba8(self.pixels.clone())
                    .to_rgb8()
                    .write_with_encoder(encoder)
                    .map_err(MediaError::Encode)?;
                Some(q)
            }
            ArtifactFormat::Png => {
                self.pixels
                    .write_to(&mut Cursor::new(&mut buf), format.image_format())
                    .map_err(MediaError::Encode)?;
                None
            }
        };

        debug!(
            format = %format,
            width = self.width(),
            height = self.height(),
            bytes = buf.len(),
            "Encoded surface"
        );
        Ok(EncodedImageArtifact::new(format, quality, self.dimensions(), buf))
    }
}

/// Clip a segment to `(min_x, min_y, max_x, max_y)` (Liang-Barsky).
///
/// Returns `None` when nothing of the segment lies inside, or a coordinate
/// is not finite.
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (x0, y0) = (f64::from(from.0), f64::from(from.1));
    let (dx, dy) = (f64::from(to.0) - x0, f64::from(to.1) - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    let edges = [
        (-dx, x0 - f64::from(min_x)),
        (dx, f64::from(max_x) - x0),
        (-dy, y0 - f64::from(min_y)),
        (dy, f64::from(max_y) - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| ((x0 + dx * t) as f32, (y0 + dy * t) as f32);
    Some((at(t0), at(t1)))
}

/// Map 0–1 quality onto the encoder's 1–100 scale.
fn jpeg_quality_percent(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}
