//! Browser-based banner editor.
//!
//! Serves the editing form, the live preview and the code panel, and pushes a
//! fresh snapshot to every connected page after each change.

pub mod api;
pub mod assets;
pub mod live;
pub mod server;
pub mod templates;
pub mod watcher;

pub use api::{ApiError, Session, SharedState, Snapshot};
pub use live::{LiveHub, LiveMessage};
pub use server::{router, BannerSource, EditorConfig, EditorServer, ServerError};
pub use templates::PageTemplates;
pub use watcher::{ConfigWatcher, WatchEvent};
