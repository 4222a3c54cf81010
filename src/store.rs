// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable, namespaced key-value persistence for the finance data layer.
//!
//! Values are arbitrary JSON documents stored together with a write
//! timestamp. A per-key retention policy turns stale entries into misses:
//! an expired entry is removed on read and reported absent.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid stored timestamp '{0}'")]
    BadTimestamp(String),
    /// Failure reported by an alternate storage provider.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Injectable time source so expiry is testable with a simulated clock.
pub type Clock = fn() -> DateTime<Utc>;

fn system_clock() -> DateTime<Utc> {
    Utc::now()
}

/// Maximum age per collection key. Keys without an entry never expire.
#[derive(Debug, Clone, Default)]
pub struct Retention {
    max_age: HashMap<String, Duration>,
}

impl Retention {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_for(mut self, key: &str, age: Duration) -> Self {
        self.max_age.insert(key.to_string(), age);
        self
    }

    pub fn max_age(&self, key: &str) -> Option<Duration> {
        self.max_age.get(key).copied()
    }
}

/// Minimal persistent key-value contract the repository is written against.
///
/// `get` takes `&mut self` because reading an expired entry removes it.
pub trait KvStore {
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    /// Wipes every key this adapter manages. Idempotent.
    fn clear_all(&mut self) -> Result<(), StoreError>;
}

/// SQLite-backed adapter: one `kv` table, durable across restarts.
///
/// An optional prefix namespaces the keys so several stores can share one
/// database file; `clear_all` only touches its own namespace.
pub struct SqliteStore {
    conn: Connection,
    prefix: Option<String>,
    retention: Retention,
    clock: Clock,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv(
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                written_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn,
            prefix: None,
            retention: Retention::default(),
            clock: system_clock,
        })
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, key),
            None => key.to_string(),
        }
    }
}

impl KvStore for SqliteStore {
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let written_at = (self.clock)().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv(key, value, written_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, written_at=excluded.written_at",
            params![self.full_key(key), serde_json::to_string(&value)?, written_at],
        )?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError> {
        let full = self.full_key(key);
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT value, written_at FROM kv WHERE key=?1",
                params![full],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let Some((raw, written_at)) = row else {
            return Ok(None);
        };
        if let Some(max_age) = self.retention.max_age(key) {
            let written = DateTime::parse_from_rfc3339(&written_at)
                .map_err(|_| StoreError::BadTimestamp(written_at.clone()))?
                .with_timezone(&Utc);
            if (self.clock)() - written > max_age {
                self.conn
                    .execute("DELETE FROM kv WHERE key=?1", params![full])?;
                return Ok(None);
            }
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key=?1", params![self.full_key(key)])?;
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        match &self.prefix {
            Some(p) => {
                self.conn.execute(
                    "DELETE FROM kv WHERE key LIKE ?1",
                    params![format!("{}:%", p)],
                )?;
            }
            None => {
                self.conn.execute("DELETE FROM kv", [])?;
            }
        }
        Ok(())
    }
}

/// In-memory adapter with the same expiry semantics. Not durable; the test
/// double for the repository and session, and the seam where an alternate
/// remote provider would plug in.
pub struct MemoryStore {
    entries: HashMap<String, (Value, DateTime<Utc>)>,
    retention: Retention,
    clock: Clock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            retention: Retention::default(),
            clock: system_clock,
        }
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), (value, (self.clock)()));
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError> {
        let Some((value, written_at)) = self.entries.get(key) else {
            return Ok(None);
        };
        if let Some(max_age) = self.retention.max_age(key) {
            if (self.clock)() - *written_at > max_age {
                self.entries.remove(key);
                return Ok(None);
            }
        }
        Ok(Some(value.clone()))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}
