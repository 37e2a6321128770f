// Folder watcher: OS notifications into a bounded channel

pub mod dispatcher;
pub mod stability;

pub use dispatcher::*;
pub use stability::*;

use crate::types::{AppError, AppResult};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, trace};

pub const EVENT_QUEUE_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedEventKind {
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedEvent {
    pub path: PathBuf,
    pub kind: WatchedEventKind,
}

impl WatchedEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: WatchedEventKind::Created,
        }
    }
}

pub struct FolderWatcher {
    _watcher: RecommendedWatcher,
    folder: PathBuf,
}

impl FolderWatcher {
    /// Start watching `folder` (non-recursive) for arriving files
    pub fn start(folder: &Path) -> AppResult<(Self, mpsc::Receiver<WatchedEvent>)> {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    for arrival in arrivals(&event) {
                        // Runs on the notify thread; blocks only when the queue is full
                        if tx.blocking_send(arrival).is_err() {
                            trace!("Dispatcher stopped, dropping event");
                        }
                    }
                }
                Err(e) => error!("Watch error: {:?}", e),
            }
        })
        .map_err(|e| AppError::config(format!("failed to create file watcher: {}", e)))?;

        watcher
            .watch(folder, RecursiveMode::NonRecursive)
            .map_err(|e| AppError::config_at(folder, format!("cannot watch folder: {}", e)))?;

        info!(folder = %folder.display(), "Watching path");
        Ok((
            Self {
                _watcher: watcher,
                folder: folder.to_path_buf(),
            },
            rx,
        ))
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

/// File arrivals carried by a raw notify event: creations and rename targets
fn arrivals(event: &Event) -> Vec<WatchedEvent> {
    match event.kind {
        EventKind::Create(_) => event.paths.iter().map(WatchedEvent::created).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().map(WatchedEvent::created).collect()
        }
        // paths are [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
            .paths
            .last()
            .map(WatchedEvent::created)
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}
