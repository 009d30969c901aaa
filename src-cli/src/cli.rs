//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Keep a theme's asset folder in sync with its source directories
#[derive(Parser, Debug)]
#[command(name = "assetsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "assetsync.yaml")]
    pub config: PathBuf,

    /// Reconcile once and exit instead of watching
    #[arg(long)]
    pub once: bool,

    /// Print asset events as JSON lines on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
