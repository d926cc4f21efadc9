//! Editor server command.

use std::path::Path;

use anyhow::Result;

use bannerkit_core::EmbedOptions;
use bannerkit_server::{EditorConfig, EditorServer};

use crate::settings::{self, TomlSource};
use crate::FieldArgs;

/// Run the editor.
pub async fn run(
    config_path: &Path,
    port: Option<u16>,
    no_open: bool,
    watch: bool,
    fields: FieldArgs,
) -> Result<()> {
    let settings = settings::load(config_path)?;
    let banner = super::resolve_banner(&settings, fields).await?;

    let config = EditorConfig {
        port: port.unwrap_or(settings.editor.port),
        host: settings.editor.host.clone(),
        open: settings.editor.open && !no_open,
        max_upload_bytes: settings.editor.max_upload_bytes(),
        banner,
        embed: EmbedOptions {
            escape: settings.export.escape,
        },
    };

    tracing::info!("Starting editor on port {}", config.port);

    let mut server = EditorServer::new(config);

    if watch || settings.editor.watch {
        if config_path.exists() {
            server = server.watch(TomlSource::new(config_path));
        } else {
            tracing::warn!(
                "Not watching {}: file does not exist",
                config_path.display()
            );
        }
    }

    server.start().await?;

    Ok(())
}
