pub mod config;
pub mod db;
pub mod export;
pub mod heatmap;
pub mod history;
pub mod ingest;
pub mod init;
pub mod log;
pub mod metrics;
pub mod sessions;
pub mod watch;

use crate::config::{Config, SourceMode};
use crate::db::SqliteEventStore;
use crate::errors::AppResult;

/// Open the configured database, applying pending migrations.
pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteEventStore> {
    SqliteEventStore::open(&cfg.database)
}

/// `--synthetic` on the command line wins over the configured mode.
pub(crate) fn effective_mode(cfg: &Config, synthetic: bool) -> SourceMode {
    if synthetic {
        SourceMode::Synthetic
    } else {
        cfg.source_mode
    }
}
