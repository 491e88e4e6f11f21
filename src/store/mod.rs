//! Persistence layer: snapshot trait plus JSON-file and in-memory backends.

pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use traits::{OwnerRecord, ReminderPersistence, StoreSnapshot};
