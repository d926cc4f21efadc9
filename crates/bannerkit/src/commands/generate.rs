//! Embed code export command.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use bannerkit_core::{generate_embed_code_with, EmbedOptions};

use crate::settings;
use crate::FieldArgs;

/// Run the generate command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    escape: bool,
    fields: FieldArgs,
) -> Result<()> {
    let settings = settings::load(config_path)?;
    let banner = super::resolve_banner(&settings, fields).await?;

    let options = EmbedOptions {
        escape: escape || settings.export.escape,
    };
    let code = generate_embed_code_with(&banner, options);

    match output.or_else(|| settings.export.output.map(PathBuf::from)) {
        Some(path) => {
            fs::write(&path, &code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote embed code to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", code).context("Failed to write embed code")?;
        }
    }

    Ok(())
}
