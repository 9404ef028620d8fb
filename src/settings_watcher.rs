//! Settings file watcher for hot reload.
//!
//! Wraps a `notify` watcher on the settings file's directory and exposes a
//! non-blocking `poll()` for the cooperative frame loop.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError, channel};

pub use crate::settings::default_settings_path;

/// What happened to the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    Modified,
    Created,
    Deleted,
    Error(String),
}

pub struct SettingsWatcher {
    path: PathBuf,
    rx: Receiver<notify::Result<Event>>,
    // Dropping the watcher stops the OS subscription.
    _watcher: RecommendedWatcher,
}

impl SettingsWatcher {
    /// Watch `path`. The parent directory is watched so that editors that
    /// replace the file through a rename are still observed.
    pub fn new(path: PathBuf) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(Self {
            path,
            rx,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events and return the most recent one concerning the
    /// settings file, if any.
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if !event.paths.iter().any(|p| p == &self.path) {
                        continue;
                    }
                    let mapped = match event.kind {
                        EventKind::Modify(_) => Some(SettingsEvent::Modified),
                        EventKind::Create(_) => Some(SettingsEvent::Created),
                        EventKind::Remove(_) => Some(SettingsEvent::Deleted),
                        _ => None,
                    };
                    if mapped.is_some() {
                        latest = mapped;
                    }
                }
                Ok(Err(e)) => latest = Some(SettingsEvent::Error(e.to_string())),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    latest = Some(SettingsEvent::Error("watcher disconnected".into()));
                    break;
                }
            }
        }
        latest
    }
}
