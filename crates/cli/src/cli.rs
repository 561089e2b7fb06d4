//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Motion Capture - wrist-IMU motion detection and speed estimation pipeline
#[derive(Parser, Debug)]
#[command(
    name = "motion-capture",
    author,
    version,
    about = "Wrist-IMU motion capture pipeline",
    long_about = "An online motion detection and dead-reckoning estimation pipeline \n\
                  for wrist-worn IMU feeds.\n\n\
                  Consumes accelerometer and gyroscope samples, detects motion bursts, \n\
                  estimates speed and spin, and persists finalized sessions to the \n\
                  configured stores."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MOTION_CAPTURE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MOTION_CAPTURE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the capture pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration and stored session information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "capture.toml",
        env = "MOTION_CAPTURE_CONFIG"
    )]
    pub config: PathBuf,

    /// Maximum number of sessions to capture (0 = unlimited)
    #[arg(long, default_value = "0", env = "MOTION_CAPTURE_MAX_SESSIONS")]
    pub max_sessions: u64,

    /// Pipeline timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "MOTION_CAPTURE_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Channel buffer size for internal queues
    #[arg(long, default_value = "1024", env = "MOTION_CAPTURE_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "MOTION_CAPTURE_METRICS_PORT")]
    pub metrics_port: u16,

    /// Replay a recorded JSONL capture instead of the mock feed
    #[arg(long, env = "MOTION_CAPTURE_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Replay speed multiplier (1.0 = original speed, 0 = as fast as possible)
    #[arg(long, default_value = "1.0", env = "MOTION_CAPTURE_REPLAY_SPEED")]
    pub replay_speed: f64,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "capture.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "capture.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the effective engine configuration
    #[arg(long)]
    pub engine: bool,

    /// List sessions found in configured file stores
    #[arg(long)]
    pub sessions: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
