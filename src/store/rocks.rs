//! RocksDB store adapter
//!
//! Hash fields and set members are flattened onto RocksDB's plain keyspace
//! with a single-byte namespace prefix per value kind, then the logical key
//! and field/member separated by a NUL byte:
//!
//! ```text
//! 0x01 <key> 0x00 <field>   -> field value      (hash namespace)
//! 0x02 <key> 0x00 <member>  -> ""               (set namespace)
//! ```
//!
//! Point lookups stay point lookups; `smembers` and `del` are bounded
//! prefix scans. Each logical key must stay a unique hash or set; the
//! namespace byte keeps the two from colliding.

use std::path::Path;

use async_trait::async_trait;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};

use super::{KvStore, StoreError};

const HASH_NS: u8 = 0x01;
const SET_NS: u8 = 0x02;
const SEP: u8 = 0x00;

pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open (or create) the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.optimize_for_point_lookup(1024);

        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    fn field_key(key: &str, field: &str) -> Vec<u8> {
        Self::composite(HASH_NS, key, field)
    }

    fn member_key(key: &str, member: &str) -> Vec<u8> {
        Self::composite(SET_NS, key, member)
    }

    fn composite(ns: u8, key: &str, tail: &str) -> Vec<u8> {
        let mut k = Vec::with_capacity(2 + key.len() + tail.len());
        k.push(ns);
        k.extend_from_slice(key.as_bytes());
        k.push(SEP);
        k.extend_from_slice(tail.as_bytes());
        k
    }

    fn key_prefix(ns: u8, key: &str) -> Vec<u8> {
        let mut p = Vec::with_capacity(2 + key.len());
        p.push(ns);
        p.extend_from_slice(key.as_bytes());
        p.push(SEP);
        p
    }

    /// Collect all physical keys under one namespace prefix.
    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, StoreError> {
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));

        let mut keys = Vec::new();
        for item in iter {
            let (k, _) = item?;
            if !k.starts_with(prefix) {
                break;
            }
            keys.push(k.to_vec());
        }
        Ok(keys)
    }
}

#[async_trait]
impl KvStore for RocksStore {
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        match self.db.get(Self::field_key(key, field))? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    async fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        for (field, value) in fields {
            batch.put(Self::field_key(key, field), value.as_bytes());
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        for ns in [HASH_NS, SET_NS] {
            for physical in self.scan_keys(&Self::key_prefix(ns, key))? {
                batch.delete(physical);
            }
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<(), StoreError> {
        self.db.put(Self::member_key(key, member), [])?;
        Ok(())
    }

    async fn srem(&self, key: &str, member: &str) -> Result<(), StoreError> {
        self.db.delete(Self::member_key(key, member))?;
        Ok(())
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let prefix = Self::key_prefix(SET_NS, key);
        let mut members = Vec::new();
        for physical in self.scan_keys(&prefix)? {
            members.push(String::from_utf8(physical[prefix.len()..].to_vec())?);
        }
        Ok(members)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.live_files()?;
        Ok(())
    }
}
