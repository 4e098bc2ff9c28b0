//! Key-value store boundary
//!
//! The ledger's only durable state lives behind [`KvStore`]: a flat store
//! with Redis-style hash records (`hget`/`hset`) and one set-valued index.
//! The gateway receives the store as an `Arc<dyn KvStore>` so adapters can
//! be swapped freely; tests run on [`memory::MemoryStore`], the CLI defaults
//! to [`rocks::RocksStore`].
//!
//! Adapters only move bytes; they never interpret the encoded portfolio
//! string and carry no domain invariants.

pub mod memory;
pub mod rocks;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("rocksdb error: {0}")]
    Rocks(#[from] rocksdb::Error),

    #[error("store key {0:?} holds a different value kind")]
    WrongKind(String),

    #[error("invalid utf-8 in stored value: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Minimal hash-and-set surface the ledger needs from its store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read one field of a hash record. `None` when the key or field is absent.
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Write (create or overwrite) fields of a hash record.
    async fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Delete a key and everything stored under it.
    async fn del(&self, key: &str) -> Result<(), StoreError>;

    /// Add a member to a set-valued key.
    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// Remove a member from a set-valued key; absent members are ignored.
    async fn srem(&self, key: &str, member: &str) -> Result<(), StoreError>;

    /// All members of a set-valued key, in stable (sorted) order.
    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Health check, invoked once at startup before serving operations.
    async fn ping(&self) -> Result<(), StoreError>;
}
