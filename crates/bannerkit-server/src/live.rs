//! WebSocket live updates.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::api::Snapshot;

/// Messages pushed to editor pages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    /// Connection established
    Connected,

    /// Banner state changed; carries the re-rendered preview and embed code
    Snapshot(Snapshot),

    /// Transient notice for the user
    Notice {
        title: String,
        description: String,
    },
}

/// Hub for broadcasting live messages to all connected pages.
#[derive(Debug, Clone)]
pub struct LiveHub {
    sender: broadcast::Sender<LiveMessage>,
}

impl LiveHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Send a message to all connected pages.
    pub fn send(&self, msg: LiveMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveMessage> {
        self.sender.subscribe()
    }

    /// Number of connected pages.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}
