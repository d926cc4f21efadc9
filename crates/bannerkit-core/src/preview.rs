//! Live preview tree.
//!
//! The preview is a pure function of [`BannerConfig`]: a text block with the
//! full title and subtitle next to an image block. Whether the image actually
//! loads is decided by an [`ImageProbe`]; a failed image is swapped for the
//! bundled placeholder.

use serde::Serialize;

use crate::config::BannerConfig;
use crate::image::DataUri;
use crate::placeholder::PLACEHOLDER_PATH;

/// Alternative text of the banner image.
pub const IMAGE_ALT: &str = "Character";

/// Rendered preview of a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualTree {
    pub text: TextBlock,
    pub image: ImageBlock,
}

/// Text region: label line and headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    /// Full title, not truncated
    pub title: String,
    pub subtitle: String,
}

/// Image region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    /// Requested image source
    pub src: String,
    pub alt: &'static str,
    /// Substituted when the image fails to load
    pub fallback: &'static str,
    pub status: ImageStatus,
}

impl ImageBlock {
    /// Source the renderer should display right now.
    pub fn effective_src(&self) -> &str {
        match self.status {
            ImageStatus::Failed => self.fallback,
            ImageStatus::Loaded | ImageStatus::Deferred => &self.src,
        }
    }

    /// Whether the placeholder is being shown.
    pub fn is_placeholder(&self) -> bool {
        self.status == ImageStatus::Failed
    }
}

/// Load state of the banner image at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    /// Known to load
    Loaded,
    /// Resolved by the rendering engine, which swaps in the fallback on error
    Deferred,
    /// Known not to load; the placeholder is shown
    Failed,
}

/// Decides whether an image source will load.
pub trait ImageProbe {
    fn probe(&self, src: &str) -> ImageStatus;
}

/// Probe that needs no I/O.
///
/// Inline `data:` images load when their payload decodes; blank sources and
/// broken inline payloads fail; remote URLs are left to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProbe;

impl ImageProbe for DefaultProbe {
    fn probe(&self, src: &str) -> ImageStatus {
        let src = src.trim();
        if src.is_empty() {
            return ImageStatus::Failed;
        }

        if src.starts_with("data:") {
            return match DataUri::parse(src) {
                Some(uri) if uri.media_type().starts_with("image/") => {
                    if !uri.is_base64() {
                        // Percent-encoded SVG and friends
                        ImageStatus::Loaded
                    } else {
                        match uri.payload() {
                            Some(bytes) if !bytes.is_empty() => ImageStatus::Loaded,
                            _ => ImageStatus::Failed,
                        }
                    }
                }
                _ => ImageStatus::Failed,
            };
        }

        ImageStatus::Deferred
    }
}

impl<F> ImageProbe for F
where
    F: Fn(&str) -> ImageStatus,
{
    fn probe(&self, src: &str) -> ImageStatus {
        self(src)
    }
}

/// Render the preview using [`DefaultProbe`].
pub fn render_preview(config: &BannerConfig) -> VisualTree {
    render_preview_with(config, &DefaultProbe)
}

/// Render the preview, resolving the image through `probe`.
pub fn render_preview_with(config: &BannerConfig, probe: &impl ImageProbe) -> VisualTree {
    let status = probe.probe(&config.image_source);

    if status == ImageStatus::Failed {
        tracing::debug!("Image failed to load, showing placeholder");
    }

    VisualTree {
        text: TextBlock {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
        },
        image: ImageBlock {
            src: config.image_source.clone(),
            alt: IMAGE_ALT,
            fallback: PLACEHOLDER_PATH,
            status,
        },
    }
}
