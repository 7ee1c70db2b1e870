use crate::config::MAX_ACTIVE_WINDOW_MINUTES;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for wgmonitor
/// CLI application to monitor WireGuard usage from its logs
#[derive(Parser)]
#[command(
    name = "wgmonitor",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tail WireGuard connection/traffic logs, store events in SQLite and report usage metrics",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the configured log sources (repeatable)
    #[arg(global = true, long = "source", value_name = "PATH")]
    pub sources: Vec<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with default values")]
        migrate: bool,
    },

    /// Read the log sources once and store new events
    Ingest {
        #[arg(long = "synthetic", help = "Use generated mock data instead of log files")]
        synthetic: bool,

        #[arg(long = "json", help = "Print the ingest report as JSON")]
        json: bool,
    },

    /// Show current usage metrics
    Metrics {
        #[arg(long = "json", help = "Print metrics as JSON")]
        json: bool,
    },

    /// List events from the last few minutes
    Sessions {
        #[arg(
            long = "window-minutes",
            help = "Look-back window (default: active_window_minutes)",
            value_parser = clap::value_parser!(i64).range(1..=MAX_ACTIVE_WINDOW_MINUTES)
        )]
        window_minutes: Option<i64>,

        #[arg(long = "json")]
        json: bool,
    },

    /// Show stored events from the last days
    History {
        #[arg(long, short, help = "Number of days to include (default: history_days)")]
        days: Option<u32>,

        #[arg(long, help = "Only events of this user")]
        user: Option<String>,

        #[arg(long = "hourly", help = "Aggregate bandwidth per hour")]
        hourly: bool,

        #[arg(long = "json")]
        json: bool,
    },

    /// Activity heatmap (hour of day × day of week)
    Heatmap {
        #[arg(long, short, help = "Number of days to include (default: history_days)")]
        days: Option<u32>,

        #[arg(long = "json")]
        json: bool,
    },

    /// Run the periodic ingest → metrics loop
    Watch {
        #[arg(long = "synthetic", help = "Use generated mock data instead of log files")]
        synthetic: bool,

        #[arg(long = "interval", help = "Seconds between cycles (default: interval_secs)")]
        interval: Option<u64>,

        #[arg(long = "cycles", help = "Stop after this many cycles")]
        cycles: Option<u64>,

        #[arg(long = "json", help = "Emit one JSON object per cycle")]
        json: bool,
    },

    /// Manage the database (migrations, integrity checks, retention, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,

        #[arg(long = "prune", help = "Delete events older than retention_days")]
        prune: bool,

        #[arg(long = "retention-days", requires = "prune")]
        retention_days: Option<u32>,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Export stored events
    Export {
        #[arg(long, value_enum, help = "Output format")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short, help = "Only the last N days (default: everything)")]
        days: Option<u32>,
    },
}
