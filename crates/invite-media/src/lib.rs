//! Media core for the party invitation page.
//!
//! Provides photo normalization (downscale + JPEG re-encode) for the memory
//! wall and a freehand signature capture surface for RSVP greetings. Both
//! produce self-contained [`EncodedImageArtifact`]s that render as data URIs.

pub mod artifact;
pub mod capture;
pub mod greeting;
pub mod input;
pub mod normalize;
pub mod surface;

// Re-exports for convenience
pub use artifact::{ArtifactFormat, EncodedImageArtifact};
pub use capture::StrokeCapture;
pub use greeting::Greeting;
pub use input::{InputAdapter, InputEvent, InputPhase, Modality, Point, RawInput};
pub use normalize::{NormalizeOptions, normalize_bytes, normalize_file, target_dimensions};
pub use surface::Surface;

/// Maximum photo width in pixels before upload.
pub const DEFAULT_MAX_WIDTH: u32 = 800;

/// JPEG compression quality on a 0–1 scale.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.7;

/// Errors that can occur while producing image artifacts.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Input could not be decoded as an image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Drawing surface unavailable for {width}x{height}")]
    RenderSurface { width: u32, height: u32 },

    #[error("Image encode error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type alias for media operations.
pub type Result<T> = std::result::Result<T, MediaError>;
