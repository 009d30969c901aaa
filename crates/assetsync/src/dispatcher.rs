//! Routes one change event to the owning target's copy or delete.

use std::path::PathBuf;

use tracing::debug;

use crate::context::SyncContext;
use crate::error::Result;
use crate::events::{AssetEvent, AssetEventKind, ChangeEvent, ChangeKind};
use crate::operations::{copy_one, delete_one, CopyOutcome, DeleteOutcome};
use crate::resolver::resolve_destination;
use crate::target::Target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No target claims the path.
    Unowned,
    /// The owning target ignores the path.
    Ignored,
    Copied(PathBuf),
    SourceMissing(PathBuf),
    Deleted(DeleteOutcome),
    /// The operation failed; already logged unless silent.
    Failed(String),
}

/// Applies a single change event. Never fails: errors are logged (unless
/// silent) and returned as [`DispatchOutcome::Failed`] so the event stream
/// keeps flowing.
pub async fn dispatch(ctx: &SyncContext, event: &ChangeEvent, targets: &[Target]) -> DispatchOutcome {
    match try_dispatch(ctx, event, targets).await {
        Ok(outcome) => outcome,
        Err(e) => {
            ctx.error(&format!(
                "Failed to {} {}: {}",
                event.kind,
                ctx.public_relative(&event.path),
                e
            ));
            DispatchOutcome::Failed(e.to_string())
        }
    }
}

async fn try_dispatch(
    ctx: &SyncContext,
    event: &ChangeEvent,
    targets: &[Target],
) -> Result<DispatchOutcome> {
    let Some(target) = owning_target(ctx, event, targets)? else {
        debug!("No target owns {}", event.path.display());
        return Ok(DispatchOutcome::Unowned);
    };

    if ctx
        .matcher
        .matches_any(&event.path, &target.ignore_patterns)?
    {
        ctx.emit(AssetEvent::new(
            AssetEventKind::Ignore,
            ctx.public_relative(&event.path),
        ));
        return Ok(DispatchOutcome::Ignored);
    }

    match event.kind {
        ChangeKind::Create | ChangeKind::Update => {
            match copy_one(ctx, &event.path, target).await? {
                CopyOutcome::Copied(destination) => Ok(DispatchOutcome::Copied(destination)),
                CopyOutcome::SourceMissing(source) => Ok(DispatchOutcome::SourceMissing(source)),
            }
        }
        ChangeKind::Delete => {
            let destination = resolve_destination(&event.path, target)?;
            let outcome = delete_one(ctx, &destination, false).await?;
            Ok(DispatchOutcome::Deleted(outcome))
        }
    }
}

/// First target, in configuration order, whose source patterns match.
fn owning_target<'a>(
    ctx: &SyncContext,
    event: &ChangeEvent,
    targets: &'a [Target],
) -> Result<Option<&'a Target>> {
    for target in targets {
        if ctx
            .matcher
            .matches_any(&event.path, &target.source_patterns)?
        {
            return Ok(Some(target));
        }
    }
    Ok(None)
}
