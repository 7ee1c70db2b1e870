use super::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregator::sort_chronologically;
use crate::core::api::QueryApi;
use crate::db::EventReader;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::TimeRange;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { format, file, days } = cmd {
        let store = open_store(cfg)?;

        let events = match days {
            Some(d) => {
                QueryApi::new(&store, cfg.active_window()).get_usage_history(*d)?
            }
            None => {
                let mut all = store.query(&TimeRange::all(), None)?;
                sort_chronologically(&mut all);
                all
            }
        };

        ExportLogic::export(&events, *format, Path::new(file))?;
    }
    Ok(())
}
