//! Glob matching behind a small capability interface.
//!
//! Source matching, ignore matching and clean matching all go through the
//! same [`GlobEngine`], so there is exactly one glob dialect in play.

mod glob_engine;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;
use crate::paths::{literal_prefix, to_slash_string};

pub use glob_engine::GlobsetEngine;

/// A compiled pattern.
pub trait PathMatcher: Send + Sync {
    /// Tests a forward-slash path against the pattern.
    fn test(&self, path: &str) -> bool;
}

/// Compiles patterns into [`PathMatcher`]s.
pub trait GlobEngine: Send + Sync {
    fn compile(&self, pattern: &str) -> Result<Box<dyn PathMatcher>>;
}

/// Enumeration and membership tests over glob patterns.
#[derive(Clone)]
pub struct Matcher {
    engine: Arc<dyn GlobEngine>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(Arc::new(GlobsetEngine))
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}

impl Matcher {
    /// Creates a matcher over a custom glob engine.
    pub fn new(engine: Arc<dyn GlobEngine>) -> Self {
        Self { engine }
    }

    /// Compiles a single pattern, surfacing malformed globs as errors.
    pub fn compile(&self, pattern: &str) -> Result<Box<dyn PathMatcher>> {
        self.engine.compile(pattern)
    }

    /// Compiles every pattern, failing on the first malformed one.
    pub fn compile_all(&self, patterns: &[String]) -> Result<Vec<Box<dyn PathMatcher>>> {
        patterns.iter().map(|p| self.engine.compile(p)).collect()
    }

    /// Returns true if `path` matches at least one of `patterns`.
    pub fn matches_any(&self, path: &Path, patterns: &[String]) -> Result<bool> {
        let path = to_slash_string(path);
        for pattern in patterns {
            if self.engine.compile(pattern)?.test(&path) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Existing files matching any of `patterns` and none of `ignore`.
    ///
    /// A pattern whose base directory does not exist contributes nothing.
    pub fn list_matches(&self, patterns: &[String], ignore: &[String]) -> Result<BTreeSet<PathBuf>> {
        let ignore = self.compile_all(ignore)?;
        let mut found = BTreeSet::new();

        for pattern in patterns {
            let matcher = self.engine.compile(pattern)?;
            let keep = |path: &str| matcher.test(path) && !ignore.iter().any(|i| i.test(path));

            let base = literal_prefix(pattern);
            if base == *pattern {
                // Literal pattern: no walk needed.
                let path = Path::new(pattern);
                if path.is_file() && keep(pattern.as_str()) {
                    found.insert(path.to_path_buf());
                }
                continue;
            }

            let (walk_root, strip_dot) = if base.is_empty() {
                (PathBuf::from("."), true)
            } else {
                (PathBuf::from(&base), false)
            };

            let mut walker = WalkDir::new(&walk_root).follow_links(false).min_depth(1);
            if let Some(depth) = max_depth(pattern, &base) {
                walker = walker.max_depth(depth);
            }

            for entry in walker.into_iter() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        debug!("Skipping unreadable entry under {}: {}", walk_root.display(), e);
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                let path = if strip_dot {
                    entry.path().strip_prefix(".").unwrap_or(entry.path()).to_path_buf()
                } else {
                    entry.path().to_path_buf()
                };

                if keep(&to_slash_string(&path)) {
                    found.insert(path);
                }
            }
        }

        Ok(found)
    }
}

/// Number of segments below the literal base a match can sit at, or `None`
/// when the pattern contains `**`.
fn max_depth(pattern: &str, base: &str) -> Option<usize> {
    let rest = pattern[base.len()..].trim_start_matches('/');
    if rest.contains("**") {
        return None;
    }
    Some(rest.split('/').filter(|s| !s.is_empty()).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::anchor_pattern;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(max_depth("/t/icons/*.svg", "/t/icons"), Some(1));
        assert_eq!(max_depth("/t/*/x/*.svg", "/t"), Some(3));
        assert_eq!(max_depth("/t/**/*.svg", "/t"), None);
    }

    #[test]
    fn test_list_matches_filters_and_ignores() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("icons/a.svg"));
        touch(&dir.path().join("icons/_draft.svg"));
        touch(&dir.path().join("icons/readme.txt"));
        touch(&dir.path().join("icons/nested/b.svg"));

        let matcher = Matcher::default();
        let found = matcher
            .list_matches(
                &[anchor_pattern(dir.path(), "icons/*.svg")],
                &[anchor_pattern(dir.path(), "icons/_*.svg")],
            )
            .unwrap();

        assert_eq!(found.len(), 1);
        assert!(found.contains(&dir.path().join("icons/a.svg")));
    }

    #[test]
    fn test_list_matches_globstar() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("icons/a.svg"));
        touch(&dir.path().join("icons/nested/deep/b.svg"));

        let matcher = Matcher::default();
        let found = matcher
            .list_matches(&[anchor_pattern(dir.path(), "icons/**/*.svg")], &[])
            .unwrap();

        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_list_matches_missing_base_is_empty() {
        let dir = TempDir::new().unwrap();
        let matcher = Matcher::default();
        let found = matcher
            .list_matches(&[anchor_pattern(dir.path(), "missing/*.svg")], &[])
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_list_matches_literal_pattern() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("icons/a.svg"));

        let matcher = Matcher::default();
        let pattern = anchor_pattern(dir.path(), "icons/a.svg");
        let found = matcher.list_matches(&[pattern.clone()], &[]).unwrap();
        assert_eq!(found.len(), 1);

        let found = matcher.list_matches(&[pattern.clone()], &[pattern]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_matches_any() {
        let matcher = Matcher::default();
        let patterns = vec!["/t/icons/*.svg".to_string(), "/t/fonts/*.woff2".to_string()];

        assert!(matcher
            .matches_any(Path::new("/t/fonts/a.woff2"), &patterns)
            .unwrap());
        assert!(!matcher
            .matches_any(Path::new("/t/images/a.png"), &patterns)
            .unwrap());
    }
}
