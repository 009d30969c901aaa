//! Single-file copy and delete. Both are idempotent and treat a missing file
//! as a no-op rather than an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::context::SyncContext;
use crate::error::{Result, SyncError};
use crate::events::{AssetEvent, AssetEventKind};
use crate::resolver::resolve_destination;
use crate::target::Target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Bytes were written to the destination.
    Copied(PathBuf),
    /// The source vanished before it could be copied.
    SourceMissing(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed(PathBuf),
    AlreadyAbsent(PathBuf),
}

/// Copies `source` to its resolved destination, overwriting whatever is there.
pub async fn copy_one(ctx: &SyncContext, source: &Path, target: &Target) -> Result<CopyOutcome> {
    let destination = resolve_destination(source, target)?;

    if !source_exists(source).await {
        return Ok(source_missing(ctx, source));
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SyncError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    match fs::copy(source, &destination).await {
        Ok(bytes) => {
            debug!(
                "Copied {} -> {} ({} bytes)",
                source.display(),
                destination.display(),
                bytes
            );
            ctx.emit(AssetEvent::new(
                AssetEventKind::Copy,
                ctx.theme_relative(&destination),
            ));
            Ok(CopyOutcome::Copied(destination))
        }
        // Deleted between the existence check and the copy.
        Err(e) if e.kind() == ErrorKind::NotFound && !source_exists(source).await => {
            Ok(source_missing(ctx, source))
        }
        Err(e) => Err(SyncError::CopyFile {
            from: source.to_path_buf(),
            to: destination,
            source: e,
        }),
    }
}

/// Removes `path` if present. `quiet` marks clean-phase deletions.
pub async fn delete_one(ctx: &SyncContext, path: &Path, quiet: bool) -> Result<DeleteOutcome> {
    let outcome = match fs::remove_file(path).await {
        Ok(()) => DeleteOutcome::Removed(path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Nothing to delete at {}", path.display());
            DeleteOutcome::AlreadyAbsent(path.to_path_buf())
        }
        Err(e) => {
            return Err(SyncError::DeleteFile {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    ctx.emit(AssetEvent::new(AssetEventKind::Delete, ctx.theme_relative(path)).quiet(quiet));
    Ok(outcome)
}

async fn source_exists(source: &Path) -> bool {
    matches!(fs::metadata(source).await, Ok(meta) if meta.is_file())
}

fn source_missing(ctx: &SyncContext, source: &Path) -> CopyOutcome {
    ctx.warn(&format!(
        "Skipped copy of {}: source no longer exists",
        ctx.public_relative(source)
    ));
    CopyOutcome::SourceMissing(source.to_path_buf())
}
