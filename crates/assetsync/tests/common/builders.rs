//! Builder for targets declared with theme-relative paths.

#![allow(dead_code)]

use std::sync::Arc;

use assetsync::{RenameRule, Target};

use super::SyncHarness;

pub struct TargetBuilder<'a> {
    harness: &'a SyncHarness,
    sources: Vec<String>,
    dest: String,
    ignore: Vec<String>,
    clean: Option<String>,
    rename: Option<Arc<dyn RenameRule>>,
}

impl<'a> TargetBuilder<'a> {
    pub fn new(harness: &'a SyncHarness) -> Self {
        Self {
            harness,
            sources: Vec::new(),
            dest: "assets".to_string(),
            ignore: Vec::new(),
            clean: None,
            rename: None,
        }
    }

    pub fn source(mut self, pattern: &str) -> Self {
        self.sources.push(self.harness.pattern(pattern));
        self
    }

    pub fn dest(mut self, dir: &str) -> Self {
        self.dest = dir.to_string();
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.ignore.push(self.harness.pattern(pattern));
        self
    }

    pub fn clean(mut self, pattern: &str) -> Self {
        self.clean = Some(self.harness.pattern(pattern));
        self
    }

    pub fn rename(mut self, rule: impl RenameRule + 'static) -> Self {
        self.rename = Some(Arc::new(rule));
        self
    }

    pub fn build(self) -> Target {
        let mut target =
            Target::new(self.sources, self.harness.path(&self.dest)).with_ignore(self.ignore);
        if let Some(clean) = self.clean {
            target = target.with_clean(clean);
        }
        target.rename_rule = self.rename;
        target
    }
}

/// `src/icons/*.svg -> assets/`, cleaning `assets/*.svg`.
pub fn icons_target(harness: &SyncHarness) -> Target {
    TargetBuilder::new(harness)
        .source("src/icons/*.svg")
        .dest("assets")
        .clean("assets/*.svg")
        .build()
}
