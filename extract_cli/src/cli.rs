//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use extract_core::Tool;
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "extract_cli", version, about = "Extraction workbench CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/extract_config.toml")]
    pub config: PathBuf,

    /// Optional opening stock CSV (strict header: material,quality,units)
    #[arg(long, value_name = "FILE")]
    pub stock: Option<PathBuf>,

    /// Emit JSON lines instead of human text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted workbench session and print outcomes and the ledger
    Replay {
        /// Replay script (TOML, one [[step]] table per action)
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
        /// Frame rate for press holds
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Run holds on the wall clock instead of simulated time
        #[arg(long, action = ArgAction::SetTrue)]
        realtime: bool,
    },
    /// Score a synthetic processing state without touching the ledger
    Score {
        /// Material id from the catalog
        #[arg(long)]
        material: String,
        /// Tool that touched the material (repeatable)
        #[arg(long = "tool", value_name = "TOOL")]
        tools: Vec<Tool>,
        /// Knife cuts
        #[arg(long, default_value_t = 0)]
        chops: u32,
        /// Completed pestle rotations
        #[arg(long, default_value_t = 0)]
        rotations: u32,
        /// Scraper strokes
        #[arg(long, default_value_t = 0)]
        strokes: u32,
        /// Average deviation of each scraper stroke
        #[arg(long, default_value_t = 0.0)]
        deviation: f32,
    },
    /// Validate the config (and stock, if given) and list materials
    Check,
}
