//! Key-value store abstraction
//!
//! Values are plain JSON documents. Implementations must be cheap to share
//! behind an `Arc` and safe to call from concurrent request handlers.

use crate::error::PersistenceError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: Value) -> Result<(), PersistenceError>;

    /// Remove a key; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;

    /// Whether values survive a process restart
    fn is_durable(&self) -> bool {
        false
    }
}
