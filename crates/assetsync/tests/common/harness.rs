//! Test harness for isolated sync runs.
//!
//! Every harness owns a temp directory laid out like a theme:
//! `src/` holds source assets and `assets/` receives the copies.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use tokio::sync::broadcast::Receiver;

use assetsync::paths::anchor_pattern;
use assetsync::{AssetEvent, AssetEventKind, BroadcastReporter, Report, SyncContext};

pub struct SyncHarness {
    temp_dir: TempDir,
    reporter: BroadcastReporter,
    receiver: Receiver<Report>,
}

impl SyncHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("src")
            .create_dir_all()
            .expect("Failed to create src dir");

        let reporter = BroadcastReporter::default();
        let receiver = reporter.subscribe();

        Self {
            temp_dir,
            reporter,
            receiver,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.child(relative).path().to_path_buf()
    }

    /// Absolute glob for a theme-relative pattern.
    pub fn pattern(&self, relative: &str) -> String {
        anchor_pattern(self.root(), relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let child = self.temp_dir.child(relative);
        if let Some(parent) = child.path().parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        child.write_str(content).expect("Failed to write file");
        child.path().to_path_buf()
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.path(relative)).expect("Failed to remove file");
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).expect("Failed to read file")
    }

    /// Sorted file names directly inside a theme-relative directory.
    pub fn list(&self, relative: &str) -> Vec<String> {
        let dir = self.path(relative);
        if !dir.exists() {
            return Vec::new();
        }
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Context rooted at the harness with reports captured.
    pub fn context(&self) -> SyncContext {
        SyncContext::new(self.root(), self.path("src")).with_reporter(self.reporter())
    }

    pub fn reporter(&self) -> Arc<BroadcastReporter> {
        Arc::new(self.reporter.clone())
    }

    /// Everything reported since the last drain.
    pub fn drain(&mut self) -> Vec<Report> {
        let mut reports = Vec::new();
        while let Ok(report) = self.receiver.try_recv() {
            reports.push(report);
        }
        reports
    }

    /// Asset events since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<AssetEvent> {
        self.drain()
            .into_iter()
            .filter_map(|report| match report {
                Report::Event(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn events_of(&mut self, kind: AssetEventKind) -> Vec<AssetEvent> {
        self.drain_events()
            .into_iter()
            .filter(|event| event.kind == kind)
            .collect()
    }
}

impl Default for SyncHarness {
    fn default() -> Self {
        Self::new()
    }
}
