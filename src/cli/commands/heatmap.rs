use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::api::QueryApi;
use crate::errors::AppResult;
use crate::models::Heatmap;
use crate::models::metrics::WEEKDAY_LABELS;
use crate::ui::messages::header;
use crate::utils::colors::heat_glyph;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Heatmap { days, json } = cmd {
        let store = open_store(cfg)?;
        let api = QueryApi::new(&store, cfg.active_window());
        let days = days.unwrap_or(cfg.history_days);
        let heatmap = api.get_activity_heatmap(days)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&heatmap)?);
        } else {
            header(format!("User activity, last {} days", days));
            print_heatmap(&heatmap);
        }
    }
    Ok(())
}

fn print_heatmap(heatmap: &Heatmap) {
    let max = heatmap.max();

    print!("hour ");
    for label in WEEKDAY_LABELS {
        print!("{:>6}", label);
    }
    println!();

    for (hour, row) in heatmap.cells.iter().enumerate() {
        print!("{:>4} ", hour);
        for &count in row {
            print!("{:>4} {}", count, heat_glyph(count, max));
        }
        println!();
    }
    println!("total events: {}", heatmap.total());
}
