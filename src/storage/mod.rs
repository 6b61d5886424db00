//! Persistent key-value storage backing the user preferences
//!
//! - [`store`]: `KeyValueStore` trait
//! - [`sqlite`]: SQLite-backed store used by the CLI
//! - [`memory`]: in-memory store for tests and as a fallback
//! - [`error`]: storage error type

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::KeyValueStore;
