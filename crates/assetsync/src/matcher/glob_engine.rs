use globset::{GlobBuilder, GlobMatcher};

use super::{GlobEngine, PathMatcher};
use crate::error::{Result, SyncError};

/// Shell-style glob engine backed by `globset`.
///
/// `*` and `?` never cross a `/`, `**` spans directories, and `{a,b}`
/// alternation and `[...]` classes are supported. Matching is case-sensitive.
/// A backslash is an ordinary character; metacharacters are escaped by
/// wrapping them in a class (`[*]`).
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobsetEngine;

struct CompiledGlob {
    matcher: GlobMatcher,
}

impl PathMatcher for CompiledGlob {
    fn test(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

impl GlobEngine for GlobsetEngine {
    fn compile(&self, pattern: &str) -> Result<Box<dyn PathMatcher>> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .case_insensitive(false)
            .backslash_escape(false)
            .build()
            .map_err(|e| SyncError::Pattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?;

        Ok(Box::new(CompiledGlob {
            matcher: glob.compile_matcher(),
        }))
    }
}
