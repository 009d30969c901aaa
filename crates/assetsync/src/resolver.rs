use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};
use crate::paths::normalize_path;
use crate::target::Target;

/// Computes where `source_file` lands for `target`.
///
/// Pure: the same inputs always give the same path. A rename rule that fails,
/// or returns something that is not a plain file name, is a configuration
/// error and is returned as [`SyncError::Rename`].
pub fn resolve_destination(source_file: &Path, target: &Target) -> Result<PathBuf> {
    let file_name = source_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SyncError::Rename {
            path: source_file.to_path_buf(),
            reason: "source path has no file name".to_string(),
        })?;

    let file_name = match &target.rename_rule {
        Some(rule) => {
            let renamed = rule
                .rename(&file_name, source_file)
                .map_err(|e| SyncError::Rename {
                    path: source_file.to_path_buf(),
                    reason: e.to_string(),
                })?;
            validate_file_name(source_file, renamed)?
        }
        None => file_name,
    };

    Ok(normalize_path(&target.destination_dir.join(file_name)))
}

fn validate_file_name(source_file: &Path, name: String) -> Result<String> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');

    if invalid {
        return Err(SyncError::Rename {
            path: source_file.to_path_buf(),
            reason: format!("rename rule returned an invalid file name '{}'", name),
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{FixedName, RenameResult, RenameRule};

    fn target() -> Target {
        Target::new(vec!["/t/src/icons/*.svg".to_string()], "/t/theme/./assets")
    }

    #[test]
    fn test_identity_without_rule() {
        let dest = resolve_destination(Path::new("/t/src/icons/a.svg"), &target()).unwrap();
        assert_eq!(dest, PathBuf::from("/t/theme/assets/a.svg"));
    }

    #[test]
    fn test_rule_sees_full_source_path() {
        let target = target().with_rename(|name: &str, source: &Path| {
            if source.to_string_lossy().contains("/icons/") {
                format!("icon-{}", name)
            } else {
                name.to_string()
            }
        });
        let dest = resolve_destination(Path::new("/t/src/icons/a.svg"), &target).unwrap();
        assert_eq!(dest, PathBuf::from("/t/theme/assets/icon-a.svg"));
    }

    #[test]
    fn test_deterministic() {
        let target = target().with_rename(FixedName("sprite.svg".to_string()));
        let first = resolve_destination(Path::new("/t/src/icons/a.svg"), &target).unwrap();
        let second = resolve_destination(Path::new("/t/src/icons/a.svg"), &target).unwrap();
        assert_eq!(first, second);
    }

    struct Failing;

    impl RenameRule for Failing {
        fn rename(&self, _file_name: &str, _source: &Path) -> RenameResult {
            Err("no mapping for file".into())
        }
    }

    #[test]
    fn test_failing_rule_is_fatal() {
        let target = target().with_rename(Failing);
        let err = resolve_destination(Path::new("/t/src/icons/a.svg"), &target).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("no mapping for file"));
    }

    #[test]
    fn test_rule_cannot_escape_destination() {
        let target = target().with_rename(FixedName("../a.svg".to_string()));
        let err = resolve_destination(Path::new("/t/src/icons/a.svg"), &target).unwrap_err();
        assert!(matches!(err, SyncError::Rename { .. }));
    }
}
