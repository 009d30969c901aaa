pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, resolve_config, LoadedConfig};
pub use schema::{AffixConfig, Config, Patterns, RenameConfig, TargetConfig};
