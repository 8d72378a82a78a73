//! Command-line arguments and runner errors.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use starflight_core::error::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop has stopped")]
    LoopStopped,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Headless space-flight simulation.
///
/// Reads pilot input as JSON lines on stdin, e.g.
/// `{"type":"Pressed","control":"Forward"}`. A line reading `quit` stops the run.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "starflight", version)]
pub struct Args {
    /// JSON config file; defaults apply when absent
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Overrides the config seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Stop after this many ticks instead of running until input closes
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
