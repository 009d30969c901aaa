use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::events::AssetEvent;
use crate::matcher::Matcher;
use crate::paths::display_relative;
use crate::reporter::{Reporter, TracingReporter};

/// Everything the engine needs besides the targets themselves.
///
/// Passed by reference into every operation instead of living in globals.
#[derive(Clone)]
pub struct SyncContext {
    pub matcher: Matcher,
    pub reporter: Arc<dyn Reporter>,
    /// Suppresses recoverable warnings and errors.
    pub silent: bool,
    /// Root for displaying destination paths.
    pub theme_root: PathBuf,
    /// Root for displaying source paths.
    pub public_dir: PathBuf,
}

impl SyncContext {
    /// Creates a context that logs through `tracing` with the default glob engine.
    pub fn new(theme_root: impl Into<PathBuf>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            matcher: Matcher::default(),
            reporter: Arc::new(TracingReporter),
            silent: false,
            theme_root: theme_root.into(),
            public_dir: public_dir.into(),
        }
    }

    /// Replaces the sink for events, warnings and errors.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the glob engine used for every match.
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Sets whether recoverable warnings and errors are suppressed.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Reports an asset event. Never suppressed.
    pub fn emit(&self, event: AssetEvent) {
        self.reporter.event(&event);
    }

    /// Reports a warning unless silent.
    pub fn warn(&self, message: &str) {
        if !self.silent {
            self.reporter.warn(message);
        }
    }

    /// Reports an error unless silent.
    pub fn error(&self, message: &str) {
        if !self.silent {
            self.reporter.error(message);
        }
    }

    /// Display form of a destination path.
    pub fn theme_relative(&self, path: &Path) -> String {
        display_relative(&self.theme_root, path)
    }

    /// Display form of a source path.
    pub fn public_relative(&self, path: &Path) -> String {
        display_relative(&self.public_dir, path)
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("silent", &self.silent)
            .field("theme_root", &self.theme_root)
            .field("public_dir", &self.public_dir)
            .finish_non_exhaustive()
    }
}
