//! Image payloads: local files turned into self-contained `data:` URIs.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A user-chosen local image file.
#[derive(Debug, Clone, Default)]
pub struct ImageFile {
    /// Raw file contents
    pub bytes: Vec<u8>,

    /// Original file name, used for extension lookup
    pub file_name: Option<String>,

    /// Media type reported by whoever supplied the file
    pub media_type: Option<String>,
}

/// Errors that can occur while decoding an image payload.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image file is empty")]
    Empty,

    #[error("Not an image: {0}")]
    UnsupportedMediaType(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImageFile {
    /// Wrap raw bytes with no metadata.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ..Default::default()
        }
    }

    /// Attach the original file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Attach a declared media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Read an image file from disk without blocking the runtime.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string());

        Ok(Self {
            bytes,
            file_name,
            media_type: None,
        })
    }

    /// Resolve the media type: declared `image/*` type first, then magic bytes,
    /// then the file extension.
    pub fn resolve_media_type(&self) -> Option<String> {
        if let Some(declared) = self.media_type.as_deref() {
            let declared = declared.trim().to_ascii_lowercase();
            if declared.starts_with("image/") {
                return Some(declared);
            }
        }

        if let Some(sniffed) = sniff_media_type(&self.bytes) {
            return Some(sniffed.to_string());
        }

        let ext = self
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|e| e.to_str())?;

        media_type_for_extension(ext).map(|s| s.to_string())
    }

    /// Encode the file as a base64 `data:` URI.
    pub fn decode(&self) -> Result<DataUri, ImageError> {
        if self.bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let media_type = self.resolve_media_type().ok_or_else(|| {
            ImageError::UnsupportedMediaType(
                self.media_type
                    .clone()
                    .or_else(|| self.file_name.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })?;

        let payload = STANDARD.encode(&self.bytes);

        Ok(DataUri {
            value: format!("data:{};base64,{}", media_type, payload),
            media_type_len: media_type.len(),
        })
    }
}

/// A `data:` URI carrying an inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    value: String,
    media_type_len: usize,
}

impl DataUri {
    const PREFIX: &'static str = "data:";

    /// Recognise an existing `data:` URI. Returns `None` for anything else.
    pub fn parse(source: &str) -> Option<Self> {
        let rest = source.strip_prefix(Self::PREFIX)?;
        let comma = rest.find(',')?;
        let header = &rest[..comma];
        let media_type_len = header.find(';').unwrap_or(header.len());

        Some(Self {
            value: source.to_string(),
            media_type_len,
        })
    }

    /// Media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.value[Self::PREFIX.len()..Self::PREFIX.len() + self.media_type_len]
    }

    /// Whether the payload is base64 encoded.
    pub fn is_base64(&self) -> bool {
        self.header().split(';').skip(1).any(|p| p == "base64")
    }

    /// Decode the payload bytes. Only base64 payloads are decoded.
    pub fn payload(&self) -> Option<Vec<u8>> {
        if !self.is_base64() {
            return None;
        }
        let data = &self.value[Self::PREFIX.len() + self.header().len() + 1..];
        STANDARD.decode(data.trim()).ok()
    }

    /// Full URI text.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume the URI, returning its full text.
    pub fn into_string(self) -> String {
        self.value
    }

    fn header(&self) -> &str {
        let rest = &self.value[Self::PREFIX.len()..];
        let comma = rest.find(',').unwrap_or(rest.len());
        &rest[..comma]
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Identify common image formats from their leading bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    if bytes.starts_with(PNG) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.len() >= 12 && &bytes[4..12] == b"ftypavif" {
        return Some("image/avif");
    }
    if bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return Some("image/x-icon");
    }
    if bytes.starts_with(b"BM") && bytes.len() >= 14 {
        return Some("image/bmp");
    }

    // SVG is text; look at the head only
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
        return Some("image/svg+xml");
    }

    None
}

fn media_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "ico" => Some("image/x-icon"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
