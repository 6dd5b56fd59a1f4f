//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// SmartPlanner - goal in, three scheduled plan variants out
#[derive(Parser)]
#[command(
    name = "sp",
    about = "Smart task planner: break a goal into scheduled tasks",
    version,
    after_help = after_help()
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Generate one plan and print it
    Plan {
        /// What to accomplish
        goal: String,

        /// Number of people sharing the work
        #[arg(short, long, default_value = "1")]
        team_size: i64,

        /// Planning mode (informational; all variants are produced)
        #[arg(short, long, default_value = "balanced")]
        mode: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for `plan`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored listing per variant
    #[default]
    Text,
    /// The HTTP response body
    Json,
}

/// Path of the log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smartplanner")
        .join("logs")
        .join("smartplanner.log")
}

fn after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}
