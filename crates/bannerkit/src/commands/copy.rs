//! Clipboard copy command.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use bannerkit_core::{copy_embed_code, generate_embed_code_with, EmbedOptions, Osc52Clipboard};

use crate::settings;
use crate::FieldArgs;

/// Run the copy command. A refused clipboard is reported, not fatal; the code
/// is printed instead.
pub async fn run(config_path: &Path, escape: bool, fields: FieldArgs) -> Result<()> {
    let settings = settings::load(config_path)?;
    let banner = super::resolve_banner(&settings, fields).await?;

    let options = EmbedOptions {
        escape: escape || settings.export.escape,
    };

    let note = copy_embed_code(&banner, options, &mut Osc52Clipboard::stdout());

    if note.is_success() {
        tracing::info!("{} {}", note.title, note.description);
    } else {
        tracing::warn!("{}: {}", note.title, note.description);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", generate_embed_code_with(&banner, options))
            .context("Failed to write embed code")?;
    }

    Ok(())
}
