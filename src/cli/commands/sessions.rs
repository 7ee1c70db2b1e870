use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::api::QueryApi;
use crate::errors::AppResult;
use crate::models::event::TIMESTAMP_FORMAT;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_kind};
use crate::utils::formatting::{format_bytes, pad_left, pad_right};
use chrono::TimeDelta;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions {
        window_minutes,
        json,
    } = cmd
    {
        let store = open_store(cfg)?;
        let api = QueryApi::new(&store, cfg.active_window());
        let minutes = window_minutes.unwrap_or(cfg.active_window_minutes);
        let sessions = api.get_active_sessions(TimeDelta::minutes(minutes))?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&sessions)?);
            return Ok(());
        }

        if sessions.is_empty() {
            info(format!("No activity in the last {} minutes.", minutes));
            return Ok(());
        }

        header(format!("Activity in the last {} minutes", minutes));
        for s in &sessions {
            println!(
                "{} | {} | {}{}{} | ↓ {} | ↑ {}",
                s.timestamp.format(TIMESTAMP_FORMAT),
                pad_right(&s.user, 12),
                color_for_kind(s.kind),
                pad_right(s.kind.label(), 12),
                RESET,
                pad_left(&format_bytes(s.bytes_received), 11),
                pad_left(&format_bytes(s.bytes_sent), 11),
            );
        }
    }
    Ok(())
}
