//! Full reconciliation of one target: clean stale destination files, then copy
//! every current source file.

use std::collections::BTreeSet;
use std::path::PathBuf;

use futures_util::future::join_all;
use tracing::{debug, info, info_span, Instrument};

use crate::context::SyncContext;
use crate::error::Result;
use crate::operations::{copy_one, delete_one, CopyOutcome, DeleteOutcome};
use crate::paths::{escape_glob, to_slash_string};
use crate::resolver::resolve_destination;
use crate::target::Target;

/// What a reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Destination files removed by the clean pass.
    pub deleted: Vec<PathBuf>,
    /// Destination files written by the copy pass.
    pub copied: Vec<PathBuf>,
    /// Sources that vanished before they could be copied.
    pub skipped: Vec<PathBuf>,
    /// One entry per file that failed, delete or copy.
    pub failures: Vec<String>,
}

/// Destinations of every source file that currently exists.
pub fn keep_set(ctx: &SyncContext, target: &Target) -> Result<BTreeSet<PathBuf>> {
    let sources = ctx
        .matcher
        .list_matches(&target.source_patterns, &target.ignore_patterns)?;
    keep_set_for(&sources, target)
}

fn keep_set_for(sources: &BTreeSet<PathBuf>, target: &Target) -> Result<BTreeSet<PathBuf>> {
    sources
        .iter()
        .map(|source| resolve_destination(source, target))
        .collect()
}

/// Files matched by the clean pattern that are not in `keep`.
///
/// The keep set is handed to the enumeration as exclusions, so a live file is
/// never even a candidate for deletion.
pub fn stale_files(
    ctx: &SyncContext,
    clean_pattern: &str,
    keep: &BTreeSet<PathBuf>,
) -> Result<BTreeSet<PathBuf>> {
    let exclusions: Vec<String> = keep
        .iter()
        .map(|path| escape_glob(&to_slash_string(path)))
        .collect();

    ctx.matcher
        .list_matches(&[clean_pattern.to_string()], &exclusions)
}

/// Runs the clean pass (when the target has a clean pattern) and then copies
/// every current source file. A target without source files is left alone.
///
/// Per-file I/O failures are collected in the report and logged once per
/// phase. Configuration errors abort the pass.
pub async fn reconcile_one(ctx: &SyncContext, target: &Target) -> Result<ReconcileReport> {
    let span = info_span!("reconcile", dest = %target.destination_dir.display());
    reconcile_inner(ctx, target).instrument(span).await
}

async fn reconcile_inner(ctx: &SyncContext, target: &Target) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    let sources = ctx
        .matcher
        .list_matches(&target.source_patterns, &target.ignore_patterns)?;

    if sources.is_empty() {
        debug!(
            "No source files for {}, nothing to clean or copy",
            target.destination_dir.display()
        );
        return Ok(report);
    }

    if let Some(clean_pattern) = &target.clean_pattern {
        let keep = keep_set_for(&sources, target)?;
        let stale = stale_files(ctx, clean_pattern, &keep)?;
        debug!("Keeping {} file(s), {} stale", keep.len(), stale.len());

        clean(ctx, &stale, &mut report).await;
    }

    let mut copy_failures = Vec::new();
    for source in &sources {
        match copy_one(ctx, source, target).await {
            Ok(CopyOutcome::Copied(destination)) => report.copied.push(destination),
            Ok(CopyOutcome::SourceMissing(source)) => report.skipped.push(source),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => copy_failures.push(e.to_string()),
        }
    }

    if !copy_failures.is_empty() {
        ctx.error(&format!(
            "Failed to copy {} file(s): {}",
            copy_failures.len(),
            copy_failures.join("; ")
        ));
        report.failures.extend(copy_failures);
    }

    info!(
        "Reconciled {}: {} copied, {} deleted, {} failed",
        target.destination_dir.display(),
        report.copied.len(),
        report.deleted.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Deletes all stale files concurrently; one failure never stops the others.
async fn clean(ctx: &SyncContext, stale: &BTreeSet<PathBuf>, report: &mut ReconcileReport) {
    let results = join_all(stale.iter().map(|path| delete_one(ctx, path, true))).await;

    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(DeleteOutcome::Removed(path)) => report.deleted.push(path),
            Ok(DeleteOutcome::AlreadyAbsent(_)) => {}
            Err(e) => failures.push(e.to_string()),
        }
    }

    if !failures.is_empty() {
        ctx.error(&format!(
            "Failed to delete {} file(s): {}",
            failures.len(),
            failures.join("; ")
        ));
        report.failures.extend(failures);
    }
}
