//! Command-line host for the invitation media core.
//!
//! Normalizes photos for the memory wall, renders recorded signature
//! strokes, and turns stored data URIs back into upload blobs.

mod commands;
mod config;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::InviteConfig;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Downscale and re-encode a photo as JPEG.
    Normalize {
        input: PathBuf,
        #[arg(long)]
        max_width: Option<u32>,
        #[arg(long)]
        quality: Option<f32>,
        /// Write the JPEG here (file or directory) instead of printing a data URI.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a JSON stroke script into a signature PNG.
    Sign {
        script: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode a file containing a data URI into its image blob.
    Blob {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// File stem of `path`, or `fallback` when it has none.
fn file_stem(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    load_dotenv();
    let config = InviteConfig::load()?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Normalize {
            input,
            max_width,
            quality,
            output,
        } => {
            let mut options = config.normalize_options();
            if let Some(w) = max_width {
                options.max_width = w;
            }
            if let Some(q) = quality {
                config::validate_setting("INVITE_JPEG_QUALITY", &q.to_string())
                    .map_err(|e| anyhow::anyhow!("--quality {e}"))?;
                options.quality = q;
            }
            let artifact = commands::normalize(&input, &options).await?;
            commands::emit(&artifact, output.as_deref(), &file_stem(&input, "photo"))?;
        }

        Commands::Sign {
            script,
            width,
            height,
            output,
        } => {
            let script = commands::load_script(&script)?;
            let width = width.unwrap_or(config.pad_width);
            let height = height.unwrap_or(config.pad_height);
            match commands::replay_signature(&script, width, height)? {
                Some(artifact) => commands::emit(&artifact, output.as_deref(), "signature")?,
                None => eprintln!("Nothing drawn."),
            }
        }

        Commands::Blob { input, output } => {
            let artifact = commands::decode_data_uri_file(&input)?;
            commands::emit(&artifact, Some(output.as_path()), &file_stem(&input, "blob"))?;
        }
    }

    Ok(())
}
