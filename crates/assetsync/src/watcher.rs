//! File system watcher that turns debounced notifications on source
//! directories into [`ChangeEvent`]s.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use tokio::sync::mpsc::UnboundedSender;
use walkdir::WalkDir;

use crate::error::{Result, SyncError};
use crate::events::{ChangeEvent, ChangeKind};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Tells creates from updates by remembering which files it has seen.
#[derive(Debug, Default)]
pub struct ChangeClassifier {
    seen: HashSet<PathBuf>,
}

impl ChangeClassifier {
    /// Starts out knowing every file currently under `roots`.
    pub fn seeded(roots: &[PathBuf]) -> Self {
        let seen = roots
            .iter()
            .flat_map(|root| WalkDir::new(root).into_iter().filter_map(|e| e.ok()))
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        Self { seen }
    }

    /// Maps a debounced path to a change, or `None` for directories.
    pub fn classify(&mut self, path: &Path) -> Option<ChangeEvent> {
        if path.is_dir() {
            return None;
        }

        let kind = if path.is_file() {
            if self.seen.insert(path.to_path_buf()) {
                ChangeKind::Create
            } else {
                ChangeKind::Update
            }
        } else {
            self.seen.remove(path);
            ChangeKind::Delete
        };

        Some(ChangeEvent::new(kind, path))
    }
}

/// Watches source directories until stopped.
pub struct SourceWatcher {
    /// Directories watched recursively.
    roots: Vec<PathBuf>,
    /// Quiet period before a burst of events is delivered.
    debounce: Duration,
    /// Shutdown flag.
    shutdown: Arc<AtomicBool>,
}

impl SourceWatcher {
    /// Creates a watcher over `roots` with a 200 ms debounce.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            debounce: DEFAULT_DEBOUNCE,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the watch loop when set.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Asks the watch loop to exit at its next poll.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Returns true once shutdown was requested.
    pub fn is_stopped(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Runs the watch loop on a background thread.
    ///
    /// The sender is dropped when the loop ends, closing the channel.
    pub fn spawn(self, sender: UnboundedSender<ChangeEvent>) -> JoinHandle<Result<()>> {
        std::thread::spawn(move || self.watch(sender))
    }

    /// Blocks until the shutdown flag is set or the receiver goes away.
    pub fn watch(&self, sender: UnboundedSender<ChangeEvent>) -> Result<()> {
        let (tx, rx) = std::sync::mpsc::channel();

        let mut debouncer: Debouncer<RecommendedWatcher> =
            new_debouncer(self.debounce, tx).map_err(|e| SyncError::Watch(e.to_string()))?;

        for root in &self.roots {
            if !root.is_dir() {
                log::warn!("Not watching {}: directory does not exist", root.display());
                continue;
            }
            debouncer
                .watcher()
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| SyncError::Watch(e.to_string()))?;
            log::info!("Watching {}", root.display());
        }

        let mut classifier = ChangeClassifier::seeded(&self.roots);

        loop {
            if self.is_stopped() {
                break;
            }

            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(Ok(events)) => {
                    for event in events {
                        let Some(change) = self.process_event(&mut classifier, event) else {
                            continue;
                        };
                        if sender.send(change).is_err() {
                            log::debug!("Change receiver dropped, stopping watcher");
                            return Ok(());
                        }
                    }
                }
                Ok(Err(e)) => {
                    log::error!("Watch error: {:?}", e);
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    log::error!("Watch channel disconnected");
                    break;
                }
            }
        }

        log::info!("Stopped watching source directories");
        Ok(())
    }

    fn process_event(
        &self,
        classifier: &mut ChangeClassifier,
        event: DebouncedEvent,
    ) -> Option<ChangeEvent> {
        let change = classifier.classify(&event.path)?;
        log::debug!("{} {}", change.kind, change.path.display());
        Some(change)
    }
}

impl Drop for SourceWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
