//! Synchronization targets and the rename strategies they carry.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;

pub type RenameResult = std::result::Result<String, Box<dyn std::error::Error + Send + Sync>>;

/// Computes the destination file name for a source file.
///
/// Receives the source base name and the full source path, so a rule can
/// depend on the directory a file lives in.
pub trait RenameRule: Send + Sync {
    fn rename(&self, file_name: &str, source: &Path) -> RenameResult;
}

impl<F> RenameRule for F
where
    F: Fn(&str, &Path) -> String + Send + Sync,
{
    fn rename(&self, file_name: &str, source: &Path) -> RenameResult {
        Ok(self(file_name, source))
    }
}

/// Every source file lands under the same name.
#[derive(Debug, Clone)]
pub struct FixedName(pub String);

impl RenameRule for FixedName {
    fn rename(&self, _file_name: &str, _source: &Path) -> RenameResult {
        Ok(self.0.clone())
    }
}

/// Regex replacement on the file name, `$1`-style captures allowed.
#[derive(Debug, Clone)]
pub struct RegexRename {
    pattern: Regex,
    replacement: String,
}

impl RegexRename {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }
}

impl RenameRule for RegexRename {
    fn rename(&self, file_name: &str, _source: &Path) -> RenameResult {
        Ok(self
            .pattern
            .replace_all(file_name, self.replacement.as_str())
            .into_owned())
    }
}

/// Adds a prefix to the file name and a suffix before its extension.
///
/// `icon.svg` with prefix `theme-` and suffix `.min` becomes `theme-icon.min.svg`.
#[derive(Debug, Clone, Default)]
pub struct AffixRename {
    pub prefix: String,
    pub suffix: String,
}

impl RenameRule for AffixRename {
    fn rename(&self, file_name: &str, _source: &Path) -> RenameResult {
        let (stem, ext) = match file_name.rfind('.') {
            Some(dot) if dot > 0 => (&file_name[..dot], &file_name[dot..]),
            _ => (file_name, ""),
        };
        Ok(format!("{}{}{}{}", self.prefix, stem, self.suffix, ext))
    }
}

/// One source-patterns -> destination-directory rule.
///
/// Patterns are absolute, forward-slash globs; the config loader anchors
/// relative patterns before building targets.
#[derive(Clone)]
pub struct Target {
    /// Globs selecting the source files this target owns.
    pub source_patterns: Vec<String>,
    /// Globs excluded from the sources.
    pub ignore_patterns: Vec<String>,
    /// Directory every source file is copied into.
    pub destination_dir: PathBuf,
    /// Maps a source file name to its destination file name.
    pub rename_rule: Option<Arc<dyn RenameRule>>,
    /// Glob over the destination whose unmatched files are deleted at session start.
    pub clean_pattern: Option<String>,
}

impl Target {
    /// Creates a target with no ignores, rename rule or clean pattern.
    pub fn new(source_patterns: Vec<String>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_patterns,
            ignore_patterns: Vec::new(),
            destination_dir: destination_dir.into(),
            rename_rule: None,
            clean_pattern: None,
        }
    }

    /// Sets the ignore globs.
    pub fn with_ignore(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Sets the clean glob.
    pub fn with_clean(mut self, pattern: impl Into<String>) -> Self {
        self.clean_pattern = Some(pattern.into());
        self
    }

    /// Sets the rename rule.
    pub fn with_rename(mut self, rule: impl RenameRule + 'static) -> Self {
        self.rename_rule = Some(Arc::new(rule));
        self
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("source_patterns", &self.source_patterns)
            .field("ignore_patterns", &self.ignore_patterns)
            .field("destination_dir", &self.destination_dir)
            .field("rename_rule", &self.rename_rule.as_ref().map(|_| "<rule>"))
            .field("clean_pattern", &self.clean_pattern)
            .finish()
    }
}
