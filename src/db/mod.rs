pub mod initialize;
pub mod log;
pub mod memory_store;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod sqlite_store;
pub mod stats;
pub mod store;

pub use memory_store::MemoryEventStore;
pub use sqlite_store::SqliteEventStore;
pub use store::{EventReader, EventStore, InsertOutcome};
