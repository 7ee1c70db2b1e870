use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::api::QueryApi;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::formatting::format_bytes;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Metrics { json } = cmd {
        let store = open_store(cfg)?;
        let api = QueryApi::new(&store, cfg.active_window());
        let metrics = api.get_metrics()?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
            return Ok(());
        }

        println!(
            "{}• Active users:{}      {}{}{}",
            CYAN, RESET, GREEN, metrics.active_users, RESET
        );
        println!(
            "{}• Total download:{}    {}",
            CYAN,
            RESET,
            format_bytes(metrics.bandwidth_usage.download)
        );
        println!(
            "{}• Total upload:{}      {}",
            CYAN,
            RESET,
            format_bytes(metrics.bandwidth_usage.upload)
        );
        println!(
            "{}• Total connections:{} {}",
            CYAN, RESET, metrics.total_connections
        );
    }
    Ok(())
}
