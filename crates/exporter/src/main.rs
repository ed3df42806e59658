//! `poster-export`: print a poster snapshot to an A0 PDF.

use anyhow::{Context, Result};
use clap::Parser;
use exporter::{ExportSettings, Exporter};
use poster_model::{Orientation, PosterTree};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "poster-export",
    version,
    about = "Rasterize a poster snapshot onto an A0 page and write it as PDF"
)]
struct Cli {
    /// Snapshot of the styled poster tree (JSON)
    snapshot: PathBuf,

    /// Element id of the node to export
    #[arg(long)]
    target: String,

    /// portrait or landscape
    #[arg(long, default_value_t = Orientation::Portrait)]
    orientation: Orientation,

    /// Export settings (JSON); defaults are used when absent
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the raster density from the settings
    #[arg(long)]
    dpi: Option<u32>,

    /// Output path; defaults to the snapshot name with a .pdf extension
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => ExportSettings::load(path)
            .with_context(|| format!("reading settings {}", path.display()))?,
        None => ExportSettings::default(),
    };
    if let Some(dpi) = cli.dpi {
        settings.dpi = dpi;
    }
    if settings.document_origin.is_none() {
        settings.document_origin = snapshot_origin(&cli.snapshot);
    }

    let json = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let tree = PosterTree::from_json(&json).context("parsing snapshot")?;

    let exporter = Exporter::new(settings);
    let document = match exporter
        .export_document(&tree, &cli.target, cli.orientation)
        .await
    {
        Ok(document) => document,
        Err(e) => {
            tracing::error!(error = %e, "Export failed");
            anyhow::bail!("{}", e.user_message());
        }
    };

    let output = cli
        .output
        .unwrap_or_else(|| cli.snapshot.with_extension("pdf"));
    std::fs::write(&output, &document.bytes)
        .with_context(|| format!("writing {}", output.display()))?;

    let paint = &document.stats.paint;
    println!(
        "Wrote {} ({} x {} px, {} bytes)",
        output.display(),
        document.pixel_size.0,
        document.pixel_size.1,
        document.bytes.len()
    );
    println!(
        "{} nodes, {} lines, {} images drawn, {} replaced by placeholders",
        paint.nodes_painted, paint.lines_painted, paint.images_drawn, paint.images_degraded
    );
    if document.stats.fonts.has_substitutions() {
        println!("{}", document.stats.fonts.summary_text());
    }
    Ok(())
}

/// Relative image references resolve against the snapshot's directory
fn snapshot_origin(snapshot: &Path) -> Option<String> {
    let dir = snapshot.canonicalize().ok()?.parent()?.to_path_buf();
    Url::from_directory_path(dir).ok().map(String::from)
}
