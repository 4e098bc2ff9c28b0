//! In-memory store adapter backed by a `DashMap`, for tests and `--memory`.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{KvStore, StoreError};

#[derive(Debug)]
enum Entry {
    Hash(HashMap<String, String>),
    Set(BTreeSet<String>),
}

/// Volatile [`KvStore`] with the same key/field semantics as the durable
/// adapter. State is lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(entry) => match entry.value() {
                Entry::Hash(fields) => Ok(fields.get(field).cloned()),
                Entry::Set(_) => Err(StoreError::WrongKind(key.to_string())),
            },
        }
    }

    async fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        match entry.value_mut() {
            Entry::Hash(existing) => {
                for (field, value) in fields {
                    existing.insert((*field).to_string(), (*value).to_string());
                }
                Ok(())
            }
            Entry::Set(_) => Err(StoreError::WrongKind(key.to_string())),
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()));
        match entry.value_mut() {
            Entry::Set(members) => {
                members.insert(member.to_string());
                Ok(())
            }
            Entry::Hash(_) => Err(StoreError::WrongKind(key.to_string())),
        }
    }

    async fn srem(&self, key: &str, member: &str) -> Result<(), StoreError> {
        if let Some(mut entry) = self.entries.get_mut(key) {
            match entry.value_mut() {
                Entry::Set(members) => {
                    members.remove(member);
                }
                Entry::Hash(_) => return Err(StoreError::WrongKind(key.to_string())),
            }
        }
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        match self.entries.get(key) {
            None => Ok(Vec::new()),
            Some(entry) => match entry.value() {
                Entry::Set(members) => Ok(members.iter().cloned().collect()),
                Entry::Hash(_) => Err(StoreError::WrongKind(key.to_string())),
            },
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_round_trip() {
        let store = MemoryStore::new();
        store
            .hset("user_john", &[("name", "john"), ("data", "6a6f686e;")])
            .await
            .unwrap();

        assert_eq!(
            store.hget("user_john", "name").await.unwrap(),
            Some("john".to_string())
        );
        assert_eq!(
            store.hget("user_john", "data").await.unwrap(),
            Some("6a6f686e;".to_string())
        );
        assert_eq!(store.hget("user_john", "missing").await.unwrap(), None);
        assert_eq!(store.hget("user_jeremy", "name").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hset_overwrites_fields() {
        let store = MemoryStore::new();
        store.hset("k", &[("data", "old")]).await.unwrap();
        store.hset("k", &[("data", "new")]).await.unwrap();
        assert_eq!(store.hget("k", "data").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_del_removes_key() {
        let store = MemoryStore::new();
        store.hset("k", &[("f", "v")]).await.unwrap();
        store.del("k").await.unwrap();
        assert_eq!(store.hget("k", "f").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_membership_sorted() {
        let store = MemoryStore::new();
        store.sadd("list_users", "john").await.unwrap();
        store.sadd("list_users", "alice").await.unwrap();
        store.sadd("list_users", "john").await.unwrap();

        assert_eq!(
            store.smembers("list_users").await.unwrap(),
            vec!["alice".to_string(), "john".to_string()]
        );

        store.srem("list_users", "john").await.unwrap();
        store.srem("list_users", "ghost").await.unwrap();
        assert_eq!(
            store.smembers("list_users").await.unwrap(),
            vec!["alice".to_string()]
        );
    }

    #[tokio::test]
    async fn test_wrong_kind_is_rejected() {
        let store = MemoryStore::new();
        store.sadd("idx", "john").await.unwrap();
        assert!(matches!(
            store.hget("idx", "name").await,
            Err(StoreError::WrongKind(_))
        ));
        assert!(matches!(
            store.hset("idx", &[("f", "v")]).await,
            Err(StoreError::WrongKind(_))
        ));
    }
}
