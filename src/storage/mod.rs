//! The durable key/value medium that the transaction store persists to.
//!
//! Each key holds one complete value. Writers always replace the whole value; there are no
//! partial updates.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::Result;
use async_trait::async_trait;

/// A durable key/value medium.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value. Returns once the value is
    /// durable as far as the medium can guarantee.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Returns every key currently stored, in no particular order.
    async fn keys(&self) -> Result<Vec<String>>;
}
