//! Read-only query surface for the presentation layer.

use crate::core::aggregator::{MetricsAggregator, activity_heatmap, hourly_bandwidth};
use crate::db::EventStore;
use crate::errors::AppResult;
use crate::models::{ActiveSession, BandwidthPoint, Event, Heatmap, Metrics};
use chrono::{Local, NaiveDateTime, TimeDelta};

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Side-effect-free views over the store, evaluated at the local clock.
pub struct QueryApi<'a> {
    aggregator: MetricsAggregator<'a>,
}

impl<'a> QueryApi<'a> {
    pub fn new(store: &'a dyn EventStore, active_window: TimeDelta) -> Self {
        Self {
            aggregator: MetricsAggregator::new(store).with_active_window(active_window),
        }
    }

    pub fn get_metrics(&self) -> AppResult<Metrics> {
        self.aggregator.snapshot(local_now())
    }

    pub fn get_active_sessions(&self, window: TimeDelta) -> AppResult<Vec<ActiveSession>> {
        self.aggregator.active_sessions(local_now(), window)
    }

    pub fn get_usage_history(&self, days: u32) -> AppResult<Vec<Event>> {
        self.aggregator.historical_series(local_now(), days)
    }

    pub fn get_activity_heatmap(&self, days: u32) -> AppResult<Heatmap> {
        Ok(activity_heatmap(&self.get_usage_history(days)?))
    }

    pub fn get_hourly_bandwidth(&self, days: u32) -> AppResult<Vec<BandwidthPoint>> {
        Ok(hourly_bandwidth(&self.get_usage_history(days)?))
    }
}
