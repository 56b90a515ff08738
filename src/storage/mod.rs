//! Durable Key-Value Storage
//!
//! A `localStorage`-shaped persistence layer: string values under string
//! keys, read once at startup and written through on every change.
//!
//! - **file**: JSON document on disk, one per data directory
//! - **memory**: in-process map for tests and ephemeral sessions
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use teamhub::storage::{FileStorage, KeyValueStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = FileStorage::open("./teamhub_data")?;
//!     storage.set("token", "abc")?;
//!     assert_eq!(storage.get("token")?.as_deref(), Some("abc"));
//!     storage.remove("token")?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key-value persistence shared by the store
///
/// Implementations must be cheap to call from inside synchronous state
/// mutations; none of the methods may block on the network.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
