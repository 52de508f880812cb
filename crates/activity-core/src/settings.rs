use clap::{Parser, Subcommand};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive statistics and row filters over user activity logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "activity-stats",
    about = "Descriptive statistics and row filters over user activity logs",
    version
)]
pub struct Settings {
    /// Logging level
    #[arg(
        long,
        global = true,
        env = "ACTIVITY_STATS_LOG_LEVEL",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"],
        ignore_case = true
    )]
    pub log_level: String,

    /// Append log lines to this file instead of stderr
    #[arg(long, global = true, env = "ACTIVITY_STATS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// One invocation performs exactly one of these.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print user, session, duration and activity statistics
    Summary {
        /// Path to CSV file
        file: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter sessions by an inclusive login date range
    DateRange {
        /// Path to CSV file
        file: PathBuf,

        /// Start date (YYYY-MM-DD)
        start_date: String,

        /// End date (YYYY-MM-DD)
        end_date: String,

        /// Optional file to export results (csv or txt)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Filter sessions by minimum duration
    Duration {
        /// Path to CSV file
        file: PathBuf,

        /// Minimum session duration
        #[arg(allow_negative_numbers = true)]
        duration: f64,

        /// Optional file to export results (csv or txt)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Search user activity by username (case-insensitive)
    Username {
        /// Path to CSV file
        file: PathBuf,

        /// Username to search
        username: String,

        /// Optional file to export results (csv or txt)
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

impl Settings {
    /// Parse from an explicit argument list, enabling unit-testing without
    /// spawning subprocesses.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// Log level normalised to the uppercase names accepted by the parser.
    pub fn log_level(&self) -> String {
        self.log_level.to_uppercase()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
