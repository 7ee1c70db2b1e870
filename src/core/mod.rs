pub mod aggregator;
pub mod api;
pub mod ingest;
pub mod log;
pub mod monitor;
pub mod parser;
pub mod sink;
pub mod source;
pub mod synthetic;
