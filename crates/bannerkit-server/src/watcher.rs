//! Config file watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the config watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Config file was created or written
    Changed(PathBuf),

    /// Config file was deleted
    Removed(PathBuf),
}

/// Watches a single config file.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Watch `file`. Returns the watcher and a channel to receive events.
    ///
    /// The parent directory is watched so editors that replace the file on save
    /// are still picked up.
    pub fn new(file: &Path) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(16);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let target = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        std::thread::spawn(move || {
            let debounce = Duration::from_millis(100);
            let mut last_sent: Option<Instant> = None;

            while let Ok(event) = sync_rx.recv() {
                let Some(watch_event) = classify_event(&target, &event) else {
                    continue;
                };

                let now = Instant::now();
                let is_change = matches!(watch_event, WatchEvent::Changed(_));
                if is_change && last_sent.is_some_and(|t| now.duration_since(t) < debounce) {
                    continue;
                }
                last_sent = Some(now);

                if async_tx.blocking_send(watch_event).is_err() {
                    break;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event for the watched file.
fn classify_event(target: &Path, event: &notify::Event) -> Option<WatchEvent> {
    use notify::EventKind;

    let path = event.paths.iter().find(|p| same_file(p, target))?;

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed(path.clone())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.clone())),
        _ => None,
    }
}

fn same_file(candidate: &Path, target: &Path) -> bool {
    if candidate == target {
        return true;
    }
    match candidate.canonicalize() {
        Ok(resolved) => resolved == target,
        Err(_) => candidate.file_name().is_some() && candidate.file_name() == target.file_name(),
    }
}
