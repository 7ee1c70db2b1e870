pub mod colors;
pub mod formatting;

pub use formatting::{format_bytes, format_duration};
