use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregator::hourly_bandwidth;
use crate::core::api::QueryApi;
use crate::errors::AppResult;
use crate::models::{BandwidthPoint, Event};
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_kind};
use crate::utils::formatting::{format_bytes, format_duration, pad_left, pad_right};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History {
        days,
        user,
        hourly,
        json,
    } = cmd
    {
        let store = open_store(cfg)?;
        let api = QueryApi::new(&store, cfg.active_window());
        let days = days.unwrap_or(cfg.history_days);

        let mut events = api.get_usage_history(days)?;
        if let Some(u) = user {
            events.retain(|e| &e.user == u);
        }

        if *hourly {
            let points = hourly_bandwidth(&events);
            if *json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                print_hourly(&points);
            }
            return Ok(());
        }

        if *json {
            println!("{}", serde_json::to_string_pretty(&events)?);
        } else if events.is_empty() {
            info(format!("No events in the last {} days.", days));
        } else {
            header(format!("Events in the last {} days", days));
            print_events(&events);
        }
    }
    Ok(())
}

fn print_events(events: &[Event]) {
    for e in events {
        let duration = e.duration.map(format_duration).unwrap_or_default();
        println!(
            "{} | {} | {}{}{} | ↓ {} | ↑ {} | {}",
            e.timestamp_str(),
            pad_right(&e.user, 12),
            color_for_kind(e.kind),
            pad_right(e.kind.label(), 12),
            RESET,
            pad_left(&format_bytes(e.bytes_received), 11),
            pad_left(&format_bytes(e.bytes_sent), 11),
            duration
        );
    }
}

fn print_hourly(points: &[BandwidthPoint]) {
    if points.is_empty() {
        info("No traffic recorded.");
        return;
    }
    header("Bandwidth per hour");
    for p in points {
        println!(
            "{} | ↓ {} | ↑ {}",
            p.hour_start.format("%Y-%m-%d %H:00"),
            pad_left(&format_bytes(p.download), 11),
            pad_left(&format_bytes(p.upload), 11),
        );
    }
}
