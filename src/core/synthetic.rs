//! Development/offline data generator.
//!
//! Emits text lines in the same formats the real gateway writes, so mock data
//! goes through the regular parser and store.

use crate::core::source::LogSource;
use crate::errors::AppResult;
use crate::models::EventOrigin;
use crate::models::event::TIMESTAMP_FORMAT;
use chrono::{Local, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct SyntheticSource {
    rng: StdRng,
    users: Vec<String>,
    anchor: Option<NaiveDateTime>,
    first_span: TimeDelta,
    follow_span: TimeDelta,
    first_batch: usize,
    follow_batch: usize,
    cycles: u64,
}

impl SyntheticSource {
    /// `user_count` peers named `peer01`, `peer02`, ... A seed makes the
    /// output reproducible.
    pub fn new(user_count: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let users = (1..=user_count.max(1))
            .map(|i| format!("peer{i:02}"))
            .collect();
        Self {
            rng,
            users,
            anchor: None,
            first_span: TimeDelta::hours(24),
            follow_span: TimeDelta::minutes(5),
            first_batch: 200,
            follow_batch: 10,
            cycles: 0,
        }
    }

    /// Generate timestamps relative to a fixed instant instead of the clock.
    pub fn with_anchor(mut self, now: NaiveDateTime) -> Self {
        self.anchor = Some(now);
        self
    }

    pub fn with_batch_sizes(mut self, first: usize, follow: usize) -> Self {
        self.first_batch = first;
        self.follow_batch = follow;
        self
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    fn line(&mut self, now: NaiveDateTime, span: TimeDelta) -> String {
        let back = self.rng.random_range(0..=span.num_seconds().max(0));
        let ts = (now - TimeDelta::seconds(back)).format(TIMESTAMP_FORMAT);
        let user = &self.users[self.rng.random_range(0..self.users.len())];

        match self.rng.random_range(0..3) {
            0 => format!("{ts} {user} connected"),
            1 => format!("{ts} {user} disconnected"),
            _ => {
                let hours = self.rng.random_range(0..6);
                let minutes = self.rng.random_range(0..60);
                let download: f64 = self.rng.random_range(0.1..500.0);
                let upload: f64 = self.rng.random_range(0.05..100.0);
                format!(
                    "{ts} {user} SESSION_END duration:{hours}h{minutes}m download:{download:.2} MB upload:{upload:.2} MB"
                )
            }
        }
    }
}

impl LogSource for SyntheticSource {
    fn name(&self) -> String {
        format!("synthetic ({} users)", self.users.len())
    }

    fn read_lines(&mut self) -> AppResult<Vec<String>> {
        let now = self.anchor.unwrap_or_else(|| Local::now().naive_local());
        let (span, count) = if self.cycles == 0 {
            (self.first_span, self.first_batch)
        } else {
            (self.follow_span, self.follow_batch)
        };
        self.cycles += 1;

        Ok((0..count).map(|_| self.line(now, span)).collect())
    }

    fn origin(&self) -> EventOrigin {
        EventOrigin::Synthetic
    }
}
