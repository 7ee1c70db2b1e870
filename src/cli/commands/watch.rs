use super::{effective_mode, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::monitor::{Monitor, MonitorSettings, sources_for};
use crate::core::sink::{ConsoleSink, JsonLinesSink, MetricsSink};
use crate::errors::AppResult;
use crate::ui::messages::info;
use std::io;
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch {
        synthetic,
        interval,
        cycles,
        json,
    } = cmd
    {
        let store = open_store(cfg)?;
        let mode = effective_mode(cfg, *synthetic);
        let sources = sources_for(cfg, mode);

        let mut settings = MonitorSettings::from(cfg);
        if let Some(secs) = interval {
            settings.interval = Duration::from_secs((*secs).max(1));
        }

        let sink: Box<dyn MetricsSink> = if *json {
            Box::new(JsonLinesSink::new(io::stdout()))
        } else {
            info(format!(
                "Watching {} source(s) every {}s ({:?} mode)",
                sources.len(),
                settings.interval.as_secs(),
                mode
            ));
            Box::new(ConsoleSink)
        };

        let mut monitor = Monitor::new(&store, sources, sink, settings);
        monitor.run(*cycles);
    }
    Ok(())
}
