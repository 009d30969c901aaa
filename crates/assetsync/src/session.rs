//! The two host-facing entry points: session start and file change.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::config::LoadedConfig;
use crate::context::SyncContext;
use crate::dispatcher::{dispatch, DispatchOutcome};
use crate::error::{Result, SyncError};
use crate::events::{ChangeEvent, ChangeKind};
use crate::paths::{display_relative, literal_prefix};
use crate::reconciler::{reconcile_one, ReconcileReport};
use crate::reporter::Reporter;
use crate::target::Target;

/// One edit/watch session over a fixed list of targets.
pub struct Session {
    ctx: SyncContext,
    targets: Vec<Target>,
    enabled: bool,
    theme_assets_dir: PathBuf,
    skip_warned: AtomicBool,
}

impl Session {
    /// Creates a session from a loaded config, logging through `tracing`.
    pub fn new(config: LoadedConfig) -> Self {
        let ctx = SyncContext::new(&config.theme_root, &config.public_dir).silent(config.silent);
        Self {
            ctx,
            targets: config.targets,
            enabled: config.enabled,
            theme_assets_dir: config.theme_assets_dir,
            skip_warned: AtomicBool::new(false),
        }
    }

    /// Replaces the reporter that receives events, warnings and errors.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.ctx = self.ctx.with_reporter(reporter);
        self
    }

    /// Returns false when the config turned syncing off.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Creates the public dir (when there is something to sync) and the theme
    /// assets dir if they are missing.
    pub fn prepare_directories(&self) -> Result<()> {
        let cwd = std::env::current_dir().unwrap_or_default();

        if !self.targets.is_empty() && !self.ctx.public_dir.exists() {
            self.ctx.warn(&format!(
                "Your publicDir does not exist, creating it at {}/ - Use this folder to store the source static assets for your theme",
                display_relative(&cwd, &self.ctx.public_dir)
            ));
            create_dir(&self.ctx.public_dir)?;
        }

        if !self.theme_assets_dir.exists() {
            self.ctx.warn(&format!(
                "Your theme assets folder does not exist, creating it at {}/ - Your static assets will be copied to this folder",
                display_relative(&cwd, &self.theme_assets_dir)
            ));
            create_dir(&self.theme_assets_dir)?;
        }

        Ok(())
    }

    /// Reconciles every target in order. Configuration errors abort and
    /// propagate; per-file failures are in the reports.
    pub async fn on_session_start(&self) -> Result<Vec<ReconcileReport>> {
        if !self.enabled {
            if !self.skip_warned.swap(true, Ordering::Relaxed) {
                self.ctx.warn("Skipping serve");
            }
            return Ok(Vec::new());
        }

        info!("Reconciling {} target(s)", self.targets.len());
        let mut reports = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            reports.push(reconcile_one(&self.ctx, target).await?);
        }
        Ok(reports)
    }

    /// Applies one change. Returns `None` when the session is disabled.
    pub async fn on_file_changed(
        &self,
        path: impl Into<PathBuf>,
        kind: ChangeKind,
    ) -> Option<DispatchOutcome> {
        if !self.enabled {
            return None;
        }
        let event = ChangeEvent::new(kind, path);
        Some(dispatch(&self.ctx, &event, &self.targets).await)
    }

    /// Directories a watcher has to observe to see every source change.
    ///
    /// Nested roots are folded into their ancestors.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let candidates: BTreeSet<PathBuf> = self
            .targets
            .iter()
            .flat_map(|t| t.source_patterns.iter())
            .map(|pattern| watch_root(pattern))
            .collect();

        let mut roots: Vec<PathBuf> = Vec::new();
        for candidate in candidates {
            if !roots.iter().any(|root| candidate.starts_with(root)) {
                roots.push(candidate);
            }
        }
        roots
    }
}

/// Deepest literal directory of a pattern.
fn watch_root(pattern: &str) -> PathBuf {
    let prefix = literal_prefix(pattern);
    let is_literal = prefix == pattern;
    let prefix = PathBuf::from(prefix);
    if is_literal {
        // Literal file pattern: watch its directory.
        prefix.parent().map(Path::to_path_buf).unwrap_or(prefix)
    } else {
        prefix
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| SyncError::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}
