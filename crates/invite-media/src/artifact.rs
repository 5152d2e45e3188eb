//! Encoded image artifacts and their data URI form.
//!
//! An artifact is a finished, self-describing image payload that a UI can
//! bind directly as an image source, or hand to an upload pipeline as a blob.

use std::fmt;
use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::{MediaError, Result};

/// Raster encodings an artifact can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// Lossy, used for normalized photos.
    Jpeg,
    /// Lossless with alpha, used for captured signatures.
    Png,
}

impl ArtifactFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    pub(crate) fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A fully encoded image: format tag, quality, dimensions and bytes.
///
/// Artifacts own their payload; a capture surface that keeps drawing after
/// handing one out never changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImageArtifact {
    format: ArtifactFormat,
    quality: Option<f32>,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl EncodedImageArtifact {
    pub(crate) fn new(
        format: ArtifactFormat,
        quality: Option<f32>,
        (width, height): (u32, u32),
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            format,
            quality,
            width,
            height,
            bytes,
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URI back into an artifact.
    ///
    /// The payload must be a decodable image of the tagged format. Quality is
    /// not recoverable from the bytes and is reported as `None`.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| MediaError::InvalidDataUri("missing 'data:' scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| MediaError::InvalidDataUri("missing ',' separator".into()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| MediaError::InvalidDataUri("payload is not base64".into()))?;
        let format = ArtifactFormat::from_mime_type(mime)
            .ok_or_else(|| MediaError::InvalidDataUri(format!("unsupported type '{mime}'")))?;

        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| MediaError::InvalidDataUri(format!("base64: {e}")))?;

        let mut reader = ImageReader::new(Cursor::new(&bytes));
        reader.set_format(format.image_format());
        let dimensions = reader.into_dimensions().map_err(MediaError::Decode)?;

        Ok(Self::new(format, None, dimensions, bytes))
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Compression quality on a 0–1 scale, for lossy formats.
    pub fn quality(&self) -> Option<f32> {
        self.quality
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Raw encoded bytes (the upload blob).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Render as a self-contained data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), BASE64.encode(&self.bytes))
    }

    /// Decode the payload back into pixels.
    pub fn decode(&self) -> Result<DynamicImage> {
        image::load_from_memory_with_format(&self.bytes, self.format.image_format())
            .map_err(MediaError::Decode)
    }
}
