//! CLI subcommands.

pub mod copy;
pub mod edit;
pub mod generate;
pub mod init;
pub mod preview;

use anyhow::{Context, Result};

use bannerkit_core::{BannerConfig, BannerFields, ImageFile};

use crate::settings::SettingsFile;
use crate::FieldArgs;

/// Build the banner from the config file, then apply command line overrides.
pub async fn resolve_banner(settings: &SettingsFile, args: FieldArgs) -> Result<BannerConfig> {
    let mut banner = settings.banner.clone().into_config();

    banner.merge(BannerFields {
        title: args.title,
        subtitle: args.subtitle,
        image_source: args.image_url,
    });

    if let Some(path) = args.image_file {
        let file = ImageFile::read(&path).await?;
        banner
            .set_image_from_file(Some(file))
            .with_context(|| format!("Failed to embed {}", path.display()))?;
        tracing::info!("Embedded {} as data URI", path.display());
    }

    Ok(banner)
}
