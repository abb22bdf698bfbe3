//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();
/// Cycle being processed when the run stopped (for JSON error details).
pub static LAST_CYCLE: OnceLock<u64> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "carctl", version, about = "Replay recorded control cycles through the HKG command synthesizer")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/carctl.toml")]
    pub config: PathBuf,

    /// Optional vehicle-policy override CSV (strict header); takes precedence over [policy].csv
    #[arg(long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins, then [logging].level, then info
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed a JSON-lines trace through the controller and print outbound messages
    Replay {
        /// Trace file, or `-` for stdin
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
        /// Write messages here instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Pace replay at this rate instead of running flat out
        #[arg(long, value_name = "HZ")]
        pace_hz: Option<u32>,
        /// Stop after this many cycles
        #[arg(long, value_name = "N")]
        max_cycles: Option<u64>,
        /// Print a per-kind message summary to stderr when done
        #[arg(long, action = ArgAction::SetTrue)]
        summary: bool,
    },
    /// Build the controller from config and run one synthetic cycle
    SelfCheck,
    /// Health check for operational monitoring
    Health,
}
