//! Sinks for asset events and user-facing warnings.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::events::AssetEvent;

/// The logger collaborator: receives asset events and recoverable failures.
pub trait Reporter: Send + Sync {
    fn event(&self, event: &AssetEvent);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Renders everything through `tracing`. Quiet events go to `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn event(&self, event: &AssetEvent) {
        if event.quiet {
            debug!(kind = %event.kind, path = %event.path, "{}", event);
        } else {
            info!(kind = %event.kind, path = %event.path, "{}", event);
        }
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// One item published by a [`BroadcastReporter`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Report {
    Event(AssetEvent),
    Warn { message: String },
    Error { message: String },
}

/// Publishes reports on a broadcast channel for embedding hosts.
#[derive(Clone)]
pub struct BroadcastReporter {
    sender: broadcast::Sender<Report>,
}

impl BroadcastReporter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.sender.subscribe()
    }

    fn send(&self, report: Report) {
        // No subscribers is fine.
        let _ = self.sender.send(report);
    }
}

impl Default for BroadcastReporter {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Reporter for BroadcastReporter {
    fn event(&self, event: &AssetEvent) {
        self.send(Report::Event(event.clone()));
    }

    fn warn(&self, message: &str) {
        self.send(Report::Warn {
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.send(Report::Error {
            message: message.to_string(),
        });
    }
}
