//! Copying embed code to the system clipboard.

use std::io::{self, IsTerminal, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::config::BannerConfig;
use crate::embed::{generate_embed_code_with, EmbedOptions};

/// Errors that can occur when writing to the clipboard.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard access denied: {0}")]
    Denied(String),

    #[error("Clipboard write failed: {0}")]
    Io(#[from] io::Error),
}

/// Somewhere text can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard reached through the terminal's OSC 52 escape sequence.
pub struct Osc52Clipboard<W: Write> {
    out: W,
    require_terminal: bool,
}

impl Osc52Clipboard<io::Stdout> {
    /// Clipboard on standard output. Refuses to write unless stdout is a terminal.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            require_terminal: true,
        }
    }
}

impl<W: Write> Osc52Clipboard<W> {
    /// Clipboard writing escape sequences into `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            require_terminal: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.require_terminal && !io::stdout().is_terminal() {
            return Err(ClipboardError::Denied(
                "standard output is not a terminal".to_string(),
            ));
        }

        // \x1b]52;c;<base64>\x07
        let encoded = STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{}\x07", encoded)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Outcome shown to the user after a copy attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

impl Notification {
    pub fn copied() -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Код скопирован!".to_string(),
            description: "Вставьте код на свой сайт".to_string(),
        }
    }

    pub fn copy_failed(error: &ClipboardError) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: "Не удалось скопировать код".to_string(),
            description: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Generate the embed code and copy it. Never fails; the outcome is reported
/// as a notification.
pub fn copy_embed_code(
    config: &BannerConfig,
    options: EmbedOptions,
    clipboard: &mut impl Clipboard,
) -> Notification {
    let code = generate_embed_code_with(config, options);

    match clipboard.write_text(&code) {
        Ok(()) => {
            tracing::info!("Copied {} bytes of embed code", code.len());
            Notification::copied()
        }
        Err(e) => {
            tracing::warn!("Failed to copy embed code: {}", e);
            Notification::copy_failed(&e)
        }
    }
}
