use super::{effective_mode, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ingest::Ingestor;
use crate::core::monitor::sources_for;
use crate::errors::AppResult;
use crate::models::IngestReport;
use crate::ui::messages::warning;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Ingest { synthetic, json } = cmd {
        let store = open_store(cfg)?;
        let mut sources = sources_for(cfg, effective_mode(cfg, *synthetic));

        let cycle = Ingestor::new(&store).ingest_all(&mut sources);

        for (name, reason) in &cycle.unavailable {
            warning(format!("Log source unavailable: {} ({})", name, reason));
        }

        if *json {
            println!("{}", serde_json::to_string_pretty(&cycle.report)?);
        } else {
            print_report(&cycle.report);
        }
    }
    Ok(())
}

fn print_report(r: &IngestReport) {
    println!("{}• Lines read:{}       {}", CYAN, RESET, r.lines_read);
    println!("{}• Events parsed:{}    {}", CYAN, RESET, r.events_parsed);
    println!(
        "{}• Inserted:{}         {}{}{}",
        CYAN, RESET, GREEN, r.events_inserted, RESET
    );
    println!("{}• Duplicates:{}       {}", CYAN, RESET, r.events_duplicate);
    println!(
        "{}• Parse failures:{}   {}{}{}",
        CYAN, RESET, YELLOW, r.parse_failures, RESET
    );
    if r.store_failures > 0 {
        println!(
            "{}• Store failures:{}   {}{}{}",
            CYAN, RESET, YELLOW, r.store_failures, RESET
        );
    }
}
