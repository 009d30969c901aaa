use assetsync::{ConfigError, SyncError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Watcher thread panicked")]
    WatcherPanicked,
}

pub type Result<T> = std::result::Result<T, CliError>;
