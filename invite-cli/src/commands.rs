//! Command implementations for the CLI.

use std::path::Path;

use anyhow::Context;
use invite_media::{
    EncodedImageArtifact, NormalizeOptions, Point, RawInput, StrokeCapture, normalize_file,
};
use serde::Deserialize;

/// A recorded signature: pad origin plus the raw host event stream.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureScript {
    /// Pad top-left corner in client coordinates.
    #[serde(default)]
    pub origin: Point,
    pub events: Vec<RawInput>,
}

/// Normalize a photo file with the given options.
pub async fn normalize(input: &Path, options: &NormalizeOptions) -> anyhow::Result<EncodedImageArtifact> {
    let artifact = normalize_file(input, options)
        .await
        .with_context(|| format!("failed to normalize {}", input.display()))?;
    tracing::info!(
        width = artifact.width(),
        height = artifact.height(),
        bytes = artifact.as_bytes().len(),
        "Image normalized"
    );
    Ok(artifact)
}

/// Replay a signature script onto a fresh pad.
///
/// Returns the latest snapshot, or `None` if nothing was drawn. A stroke
/// still open when the script runs out is ended.
pub fn replay_signature(
    script: &SignatureScript,
    width: u32,
    height: u32,
) -> anyhow::Result<Option<EncodedImageArtifact>> {
    let mut pad = StrokeCapture::new(width, height, script.origin)?;
    let mut latest = None;

    for raw in &script.events {
        if let Some(artifact) = pad.handle_raw(raw)? {
            latest = Some(artifact);
        }
    }
    if pad.is_drawing() {
        if let Some(artifact) = pad.end()? {
            latest = Some(artifact);
        }
    }

    tracing::info!(
        events = script.events.len(),
        drawn = latest.is_some(),
        "Signature replayed"
    );
    Ok(latest)
}

/// Load a signature script from a JSON file.
pub fn load_script(path: &Path) -> anyhow::Result<SignatureScript> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid script {}", path.display()))
}

/// Decode a data URI stored in a file.
pub fn decode_data_uri_file(path: &Path) -> anyhow::Result<EncodedImageArtifact> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(EncodedImageArtifact::from_data_uri(&text)?)
}

/// Write the artifact's blob to `output`, or print its data URI.
///
/// When `output` is a directory the blob lands in `<stem>.<ext>` inside it,
/// with the extension taken from the artifact's format.
pub fn emit(artifact: &EncodedImageArtifact, output: Option<&Path>, stem: &str) -> anyhow::Result<()> {
    match output {
        Some(output) => {
            let path = if output.is_dir() {
                output.join(format!("{stem}.{}", artifact.format().file_extension()))
            } else {
                output.to_path_buf()
            };
            std::fs::write(&path, artifact.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), mime = artifact.mime_type(), "Artifact written");
        }
        None => println!("{}", artifact.to_data_uri()),
    }
    Ok(())
}
