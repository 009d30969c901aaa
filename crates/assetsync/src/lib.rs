pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod matcher;
pub mod operations;
pub mod paths;
pub mod reconciler;
pub mod reporter;
pub mod resolver;
pub mod session;
pub mod target;
pub mod watcher;

pub use config::{load_config, load_config_from_str, Config, LoadedConfig};
pub use context::SyncContext;
pub use dispatcher::{dispatch, DispatchOutcome};
pub use error::{ConfigError, Result, SyncError};
pub use events::{AssetEvent, AssetEventKind, ChangeEvent, ChangeKind};
pub use matcher::{GlobEngine, Matcher, PathMatcher};
pub use operations::{copy_one, delete_one, CopyOutcome, DeleteOutcome};
pub use reconciler::{reconcile_one, ReconcileReport};
pub use reporter::{BroadcastReporter, Report, Reporter, TracingReporter};
pub use resolver::resolve_destination;
pub use session::Session;
pub use target::{AffixRename, FixedName, RegexRename, RenameRule, Target};
pub use watcher::SourceWatcher;
