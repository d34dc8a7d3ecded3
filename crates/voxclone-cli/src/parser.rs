//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::bootstrap::DeviceChoice;
use crate::commands::Commands;

/// Clone a voice from a reference recording.
///
/// Options shared by every subcommand are global and may appear before or
/// after the subcommand name.
#[derive(Debug, Parser)]
#[command(name = "voxclone")]
#[command(about = "Zero-shot voice cloning from a reference recording")]
#[command(version)]
pub struct Cli {
    /// Model weights (overrides `model_path` from --config)
    #[arg(long, global = true, env = "VOXCLONE_MODEL")]
    pub model: Option<PathBuf>,

    /// Compute device: cpu, cuda, cuda:N, or auto
    #[arg(long, global = true, env = "VOXCLONE_DEVICE")]
    pub device: Option<DeviceChoice>,

    /// JSON configuration file
    #[arg(long, global = true, env = "VOXCLONE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
