//! Standalone preview page command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use bannerkit_core::render_preview;
use bannerkit_server::PageTemplates;

use crate::settings;
use crate::FieldArgs;

/// Run the preview command.
pub async fn run(config_path: &Path, output: PathBuf, fields: FieldArgs) -> Result<()> {
    let settings = settings::load(config_path)?;
    let banner = super::resolve_banner(&settings, fields).await?;

    let tree = render_preview(&banner);
    if tree.image.is_placeholder() {
        tracing::warn!("Image could not be loaded; preview shows the placeholder");
    }

    let html = PageTemplates::new()
        .render_document(&tree)
        .context("Failed to render preview")?;

    fs::write(&output, html).with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!("Wrote preview to {}", output.display());

    Ok(())
}
