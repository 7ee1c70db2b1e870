//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Log source unavailable: {source_name} ({reason})")]
    SourceUnavailable { source_name: String, reason: String },

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Store write failure: {0}")]
    StoreWrite(String),

    // ---------------------------
    // Parsing / serialization
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Why a single log line did not produce an event.
///
/// Parse failures are values: the ingestor counts them and moves on to the
/// next line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("line does not match any known log format")]
    NoMatch,

    #[error("invalid timestamp: {0}")]
    BadTimestamp(String),

    #[error("invalid numeric field '{field}': {value}")]
    BadNumericField { field: &'static str, value: String },
}
