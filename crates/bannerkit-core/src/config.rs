//! Editable banner state.

use serde::{Deserialize, Serialize};

use crate::image::{DataUri, ImageError, ImageFile};

/// Default short label line.
pub const DEFAULT_TITLE: &str = "Займы онлайн на карту";

/// Default headline.
pub const DEFAULT_SUBTITLE: &str = "Первый заём бесплатно*";

/// Default character image.
pub const DEFAULT_IMAGE_URL: &str =
    "https://cdn.poehali.dev/files/0ac31c7c-f429-4d9b-a457-774c18628a7a.jpg";

/// The complete editable state of a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerConfig {
    /// Short label line above the headline
    #[serde(default = "default_title")]
    pub title: String,

    /// Large headline text, may span lines
    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Remote URL or `data:` URI
    #[serde(default = "default_image_source", alias = "image")]
    pub image_source: String,

    /// Whether the code panel is visible. Never exported.
    #[serde(skip)]
    pub code_panel_open: bool,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}
fn default_subtitle() -> String {
    DEFAULT_SUBTITLE.to_string()
}
fn default_image_source() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            image_source: default_image_source(),
            code_panel_open: false,
        }
    }
}

impl BannerConfig {
    /// Replace the title. No validation.
    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
    }

    /// Replace the subtitle. No validation.
    pub fn set_subtitle(&mut self, value: impl Into<String>) {
        self.subtitle = value.into();
    }

    /// Point the image at an arbitrary string. Neither well-formedness nor
    /// reachability is checked.
    pub fn set_image_from_url(&mut self, value: impl Into<String>) {
        self.image_source = value.into();
    }

    /// Decode a chosen file and assign it as the image source.
    ///
    /// Returns `Ok(false)` when no file was chosen. A file that fails to decode
    /// leaves the current image untouched.
    pub fn set_image_from_file(&mut self, file: Option<ImageFile>) -> Result<bool, ImageError> {
        let Some(file) = file else {
            return Ok(false);
        };

        let uri = file.decode()?;
        self.apply_image(uri);
        Ok(true)
    }

    /// Assign an already decoded image payload.
    ///
    /// This is the completion half of an asynchronous decode; callers that decode
    /// off-thread hand the result back here in one step.
    pub fn apply_image(&mut self, uri: DataUri) {
        tracing::debug!(
            "Image replaced with {} payload ({} bytes)",
            uri.media_type(),
            uri.as_str().len()
        );
        self.image_source = uri.into_string();
    }

    /// Flip the code panel visibility.
    pub fn toggle_code_panel(&mut self) {
        self.code_panel_open = !self.code_panel_open;
    }

    /// Apply a partial update on top of this config.
    pub fn merge(&mut self, fields: BannerFields) {
        if let Some(title) = fields.title {
            self.title = title;
        }
        if let Some(subtitle) = fields.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(image) = fields.image_source {
            self.image_source = image;
        }
    }
}

/// A partial banner update, as found in config files and CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BannerFields {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    #[serde(default, alias = "image")]
    pub image_source: Option<String>,
}

impl BannerFields {
    /// Build a full config from defaults plus these fields.
    pub fn into_config(self) -> BannerConfig {
        let mut config = BannerConfig::default();
        config.merge(self);
        config
    }
}
