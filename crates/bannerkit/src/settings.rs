//! Configuration file (banner.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use bannerkit_core::BannerFields;
use bannerkit_server::BannerSource;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct SettingsFile {
    #[serde(default)]
    pub banner: BannerFields,
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub open: bool,
    #[serde(default)]
    pub watch: bool,
    /// Upload limit in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: true,
            watch: false,
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl EditorSettings {
    /// Upload limit in bytes, clamped instead of overflowing.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ExportSettings {
    /// HTML-escape field values in the embed code
    #[serde(default)]
    pub escape: bool,
    /// Default output file for `generate`
    pub output: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7777
}
fn default_true() -> bool {
    true
}
fn default_max_upload_mb() -> usize {
    10
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Load configuration from `path` if it exists.
/// Returns an error if the file exists but is malformed.
pub fn load(path: &Path) -> Result<SettingsFile, SettingsError> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(SettingsFile::default());
    }

    let content = fs::read_to_string(path).map_err(|e| SettingsError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let settings: SettingsFile = toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(settings)
}

/// The `[banner]` section of a config file, re-read on change.
pub struct TomlSource {
    path: PathBuf,
}

impl TomlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BannerSource for TomlSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BannerFields, String> {
        load(&self.path)
            .map(|settings| settings.banner)
            .map_err(|e| e.to_string())
    }
}

pub const DEFAULT_CONFIG: &str = r#"# bannerkit configuration

[banner]
# Short label line above the headline (only the first line is exported)
title = "Займы онлайн на карту"

# Headline
subtitle = "Первый заём бесплатно*"

# Image URL or data: URI
image = "https://cdn.poehali.dev/files/0ac31c7c-f429-4d9b-a457-774c18628a7a.jpg"

[editor]
host = "127.0.0.1"
port = 7777
open = true
# Reload the banner when this file changes
watch = false
# Largest accepted image upload, in megabytes
max_upload_mb = 10

[export]
# HTML-escape title, subtitle and image source in the embed code
escape = false
"#;
