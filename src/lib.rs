//! wgmonitor library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (log parsing, event store, ingestion, metrics).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Ingest { .. } => cli::commands::ingest::handle(&cli.command, cfg),
        Commands::Metrics { .. } => cli::commands::metrics::handle(&cli.command, cfg),
        Commands::Sessions { .. } => cli::commands::sessions::handle(&cli.command, cfg),
        Commands::History { .. } => cli::commands::history::handle(&cli.command, cfg),
        Commands::Heatmap { .. } => cli::commands::heatmap::handle(&cli.command, cfg),
        Commands::Watch { .. } => cli::commands::watch::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Configuration with the command-line overrides applied.
pub fn effective_config(cli: &Cli) -> AppResult<Config> {
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if !cli.sources.is_empty() {
        cfg.sources = cli.sources.clone();
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let cfg = effective_config(&cli)?;
    dispatch(&cli, &cfg)
}
