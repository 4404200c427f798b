//! Named key-value slots.

use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};

pub type SlotResult<T> = DbResult<T>;

/// A durable slot holding text under a fixed key.
///
/// `set` replaces any prior value in one step.
pub trait KeyValueSlot {
    fn get(&self, key: &str) -> SlotResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> SlotResult<()>;
}

impl KeyValueSlot for Database {
    fn get(&self, key: &str) -> SlotResult<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        debug!(
            "slot {} read: {}",
            key,
            value
                .as_ref()
                .map(|v| format!("{} bytes", v.len()))
                .unwrap_or_else(|| "absent".into())
        );
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        debug!("slot {} written: {} bytes", key, value.len());
        Ok(())
    }
}

/// In-process slot backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueSlot for MemorySlot {
    fn get(&self, key: &str) -> SlotResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| DbError::LockPoisoned(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SlotResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| DbError::LockPoisoned(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
