//! Periodic driver: ingest → aggregate → publish, forever.

use crate::config::{Config, SourceMode};
use crate::core::aggregator::MetricsAggregator;
use crate::core::ingest::Ingestor;
use crate::core::sink::{MetricsSink, MetricsUpdate, SourceStatus};
use crate::core::source::{FileSource, LogSource};
use crate::core::synthetic::SyntheticSource;
use crate::db::EventStore;
use crate::models::Metrics;
use crate::ui::messages::{error, warning};
use chrono::{Local, NaiveDateTime, TimeDelta};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub retry_backoff: Duration,
    pub unavailable_threshold: u32,
    pub active_window: TimeDelta,
}

impl From<&Config> for MonitorSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            interval: Duration::from_secs(cfg.interval_secs),
            retry_backoff: Duration::from_secs(cfg.retry_backoff_secs),
            unavailable_threshold: cfg.unavailable_threshold.max(1),
            active_window: cfg.active_window(),
        }
    }
}

/// Build the sources for one run: either the configured files or a single
/// synthetic generator, never both.
pub fn sources_for(cfg: &Config, mode: SourceMode) -> Vec<Box<dyn LogSource>> {
    match mode {
        SourceMode::File => cfg
            .sources
            .iter()
            .map(|p| Box::new(FileSource::new(p)) as Box<dyn LogSource>)
            .collect(),
        SourceMode::Synthetic => vec![
            Box::new(SyntheticSource::new(cfg.synthetic_users, None)) as Box<dyn LogSource>
        ],
    }
}

/// What happened in one cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub update: MetricsUpdate,
    /// Every source was read, metrics were computed and published.
    pub healthy: bool,
}

pub struct Monitor<'a> {
    store: &'a dyn EventStore,
    sources: Vec<Box<dyn LogSource>>,
    sink: Box<dyn MetricsSink + 'a>,
    settings: MonitorSettings,
    consecutive_unavailable: u32,
    last_metrics: Metrics,
}

impl<'a> Monitor<'a> {
    pub fn new(
        store: &'a dyn EventStore,
        sources: Vec<Box<dyn LogSource>>,
        sink: Box<dyn MetricsSink + 'a>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            store,
            sources,
            sink,
            settings,
            consecutive_unavailable: 0,
            last_metrics: Metrics::default(),
        }
    }

    pub fn consecutive_unavailable(&self) -> u32 {
        self.consecutive_unavailable
    }

    /// Run one cycle. Never fails: problems are reported and reflected in the
    /// returned outcome.
    pub fn run_cycle(&mut self, now: NaiveDateTime) -> CycleOutcome {
        let ingestor = Ingestor::new(self.store);
        let cycle = ingestor.ingest_all(&mut self.sources);

        for (name, reason) in &cycle.unavailable {
            warning(format!("Log source unavailable: {} ({})", name, reason));
        }

        let status = self.update_source_health(&cycle.unavailable);

        let aggregator =
            MetricsAggregator::new(self.store).with_active_window(self.settings.active_window);
        let fresh = match aggregator.snapshot(now) {
            Ok(m) => {
                self.last_metrics = m;
                true
            }
            Err(e) => {
                error(format!("Failed to compute metrics: {}", e));
                false
            }
        };

        let update = MetricsUpdate {
            generated_at: now,
            metrics: self.last_metrics,
            report: cycle.report,
            status,
            fresh,
        };

        let published = match self.sink.publish(&update) {
            Ok(()) => true,
            Err(e) => {
                error(format!("Failed to publish metrics: {}", e));
                false
            }
        };

        CycleOutcome {
            healthy: cycle.unavailable.is_empty() && fresh && published,
            update,
        }
    }

    fn update_source_health(&mut self, unavailable: &[(String, String)]) -> SourceStatus {
        if unavailable.is_empty() {
            if self.consecutive_unavailable >= self.settings.unavailable_threshold {
                if let Err(e) = self.store.record_log(
                    "source_recovered",
                    "",
                    "All log sources readable again",
                ) {
                    warning(format!("Failed to write internal log: {}", e));
                }
            }
            self.consecutive_unavailable = 0;
            return SourceStatus::Ok;
        }

        self.consecutive_unavailable += 1;
        if self.consecutive_unavailable < self.settings.unavailable_threshold {
            return SourceStatus::Ok;
        }

        let names: Vec<String> = unavailable.iter().map(|(n, _)| n.clone()).collect();
        if self.consecutive_unavailable == self.settings.unavailable_threshold {
            let msg = format!(
                "unavailable for {} consecutive cycles",
                self.consecutive_unavailable
            );
            if let Err(e) = self
                .store
                .record_log("source_unavailable", &names.join(", "), &msg)
            {
                warning(format!("Failed to write internal log: {}", e));
            }
        }

        SourceStatus::Degraded {
            consecutive_failures: self.consecutive_unavailable,
            sources: names,
        }
    }

    /// Loop until `max_cycles` cycles have run (forever when `None`). After an
    /// unhealthy cycle the next one starts after the retry backoff instead of
    /// the regular interval.
    pub fn run(&mut self, max_cycles: Option<u64>) -> u64 {
        let mut cycles = 0;
        loop {
            let outcome = self.run_cycle(Local::now().naive_local());
            cycles += 1;

            if max_cycles.is_some_and(|max| cycles >= max) {
                return cycles;
            }

            let pause = if outcome.healthy {
                self.settings.interval
            } else {
                self.settings.retry_backoff
            };
            thread::sleep(pause);
        }
    }
}
