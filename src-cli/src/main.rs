//! assetsync CLI
//!
//! Reconciles every configured target, then mirrors source changes into the
//! theme's asset folder until interrupted.

mod cli;
mod error;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use assetsync::{load_config, AssetEvent, Report, Reporter, Session, SourceWatcher};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};

/// Prints every report as one JSON line on stdout.
struct JsonReporter;

impl JsonReporter {
    fn print(&self, report: Report) {
        match serde_json::to_string(&report) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to serialize report: {}", e),
        }
    }
}

impl Reporter for JsonReporter {
    fn event(&self, event: &AssetEvent) {
        self.print(Report::Event(event.clone()));
    }

    fn warn(&self, message: &str) {
        self.print(Report::Warn {
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.print(Report::Error {
            message: message.to_string(),
        });
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    tracing_log::LogTracer::init().map_err(|e| CliError::Logging(e.to_string()))?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::Logging(e.to_string()))
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = load_config(&cli.config)?;
    let mut session = Session::new(config);
    if cli.json {
        session = session.with_reporter(Arc::new(JsonReporter));
    }

    session.prepare_directories()?;
    session.on_session_start().await?;

    if cli.once || !session.is_enabled() {
        return Ok(());
    }

    let watcher = SourceWatcher::new(session.watch_roots());
    let shutdown = watcher.shutdown_handle();
    ctrlc::set_handler(move || {
        log::info!("Received Ctrl-C, shutting down");
        shutdown.store(true, Ordering::Relaxed);
    })?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = watcher.spawn(tx);

    while let Some(change) = rx.recv().await {
        session.on_file_changed(change.path, change.kind).await;
    }

    handle.join().map_err(|_| CliError::WatcherPanicked)??;
    Ok(())
}
