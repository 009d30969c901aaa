//! Change events coming in from the watcher and asset events going out to
//! observers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// The kind of a file-system change on a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ChangeKind::Create),
            "update" => Ok(ChangeKind::Update),
            "delete" => Ok(ChangeKind::Delete),
            other => Err(format!("unknown change kind '{}'", other)),
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Create => write!(f, "create"),
            ChangeKind::Update => write!(f, "update"),
            ChangeKind::Delete => write!(f, "delete"),
        }
    }
}

/// A single change observed on an absolute source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// What happened to an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetEventKind {
    Copy,
    Delete,
    Ignore,
}

impl fmt::Display for AssetEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetEventKind::Copy => write!(f, "copy"),
            AssetEventKind::Delete => write!(f, "delete"),
            AssetEventKind::Ignore => write!(f, "ignore"),
        }
    }
}

/// Observability record for one asset operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEvent {
    pub kind: AssetEventKind,
    /// Path relative to the display root (theme root or public dir).
    pub path: String,
    /// Set on clean-phase events, which are shown with lower priority.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quiet: bool,
    pub timestamp: DateTime<Utc>,
}

impl AssetEvent {
    pub fn new(kind: AssetEventKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            quiet: false,
            timestamp: Utc::now(),
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl fmt::Display for AssetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.timestamp.with_timezone(&Local).format("%H:%M:%S");
        write!(f, "{} [assetsync] {} {}", time, self.kind, self.path)?;
        if self.quiet {
            write!(f, " (clean)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind_parsing() {
        assert_eq!("create".parse::<ChangeKind>(), Ok(ChangeKind::Create));
        assert_eq!("update".parse::<ChangeKind>(), Ok(ChangeKind::Update));
        assert_eq!("delete".parse::<ChangeKind>(), Ok(ChangeKind::Delete));
        assert!("rename".parse::<ChangeKind>().is_err());
    }

    #[test]
    fn test_asset_event_serialization() {
        let event = AssetEvent::new(AssetEventKind::Delete, "assets/old.svg").quiet(true);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"delete\""));
        assert!(json.contains("\"path\":\"assets/old.svg\""));
        assert!(json.contains("\"quiet\":true"));
        assert!(json.contains("timestamp"));

        let loud = AssetEvent::new(AssetEventKind::Copy, "assets/a.svg");
        let json = serde_json::to_string(&loud).unwrap();
        assert!(!json.contains("quiet"));
    }

    #[test]
    fn test_asset_event_display() {
        let event = AssetEvent::new(AssetEventKind::Copy, "assets/a.svg");
        let line = event.to_string();
        assert!(line.ends_with("[assetsync] copy assets/a.svg"));

        let clean = AssetEvent::new(AssetEventKind::Delete, "assets/old.svg").quiet(true);
        assert!(clean.to_string().ends_with("delete assets/old.svg (clean)"));
    }
}
