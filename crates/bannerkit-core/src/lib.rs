//! Banner state, live preview tree and embed code generator.
//!
//! This crate owns the editable banner state and the two pure renderings derived
//! from it: the preview tree shown in the editor and the self-contained HTML
//! fragment exported for third-party pages.

pub mod clipboard;
pub mod config;
pub mod embed;
pub mod image;
pub mod placeholder;
pub mod preview;

pub use clipboard::{
    copy_embed_code, Clipboard, ClipboardError, Notification, NotificationKind, Osc52Clipboard,
};
pub use config::{BannerConfig, BannerFields, DEFAULT_IMAGE_URL, DEFAULT_SUBTITLE, DEFAULT_TITLE};
pub use embed::{first_line, generate_embed_code, generate_embed_code_with, EmbedOptions};
pub use image::{DataUri, ImageError, ImageFile};
pub use placeholder::{placeholder_data_uri, PLACEHOLDER_PATH, PLACEHOLDER_SVG};
pub use preview::{
    render_preview, render_preview_with, DefaultProbe, ImageBlock, ImageProbe, ImageStatus,
    TextBlock, VisualTree,
};
