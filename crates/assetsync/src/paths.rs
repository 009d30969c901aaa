//! Path helpers shared by the matcher, resolver and event rendering.
//!
//! Everything that is compared against a glob goes through
//! [`to_slash_string`] first so matching never depends on the host separator.

use std::path::{Component, Path, PathBuf};

/// Characters with a meaning in the glob dialect used by [`crate::matcher`].
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Folds `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Renders a path with forward slashes regardless of platform.
pub fn to_slash_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Returns true if the string contains any glob metacharacter.
pub fn has_glob_meta(s: &str) -> bool {
    s.contains(GLOB_META)
}

/// Escapes a literal path so it only matches itself when compiled as a glob.
pub fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if GLOB_META.contains(&c) {
            escaped.push('[');
            escaped.push(c);
            escaped.push(']');
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Leading directory of a pattern that contains no glob metacharacters.
///
/// `"/srv/theme/icons/**/*.svg"` yields `"/srv/theme/icons"`. A pattern without
/// any metacharacter is returned whole. Relative patterns with a meta first
/// segment yield an empty string.
pub fn literal_prefix(pattern: &str) -> String {
    let mut prefix = String::new();
    for (i, segment) in pattern.split('/').enumerate() {
        if has_glob_meta(segment) {
            break;
        }
        if i > 0 {
            prefix.push('/');
        }
        prefix.push_str(segment);
    }
    prefix
}

/// Joins a possibly relative pattern onto a base directory.
///
/// The base is escaped so that metacharacters in directory names stay literal.
pub fn anchor_pattern(base: &Path, pattern: &str) -> String {
    let pattern = pattern.replace('\\', "/");
    if Path::new(&pattern).is_absolute() || pattern.starts_with('/') {
        return pattern;
    }

    let base = escape_glob(&to_slash_string(&normalize_path(base)));
    let relative = pattern.trim_start_matches("./");
    if base.ends_with('/') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

/// Path relative to `root` for display, falling back to the full path.
pub fn display_relative(root: &Path, path: &Path) -> String {
    let root = normalize_path(root);
    let path = normalize_path(path);
    match path.strip_prefix(&root) {
        Ok(relative) if !relative.as_os_str().is_empty() => to_slash_string(relative),
        _ => to_slash_string(&path),
    }
}
