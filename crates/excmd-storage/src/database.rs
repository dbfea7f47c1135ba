//! SQLite-backed configuration store

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::migrations::run_migrations;
use crate::store::{decode_key, encode_key, has_prefix, ConfigStore, Entry};
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode so a second shell can read while another writes
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }
}

impl ConfigStore for Database {
    fn get(&self, key: &[&str]) -> Result<Option<String>> {
        let path = encode_key(key)?;
        self.with_connection(|conn| {
            let value = conn
                .query_row("SELECT value FROM config WHERE path = ?1", [&path], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &[&str], value: &str) -> Result<()> {
        let path = encode_key(key)?;
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO config (path, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![path, value, updated_at],
            )?;
            Ok(())
        })?;

        tracing::debug!(key = %path, "Config value stored");
        Ok(())
    }

    fn unset(&self, key: &[&str]) -> Result<()> {
        let path = encode_key(key)?;
        self.with_connection(|conn| {
            conn.execute("DELETE FROM config WHERE path = ?1", [&path])?;
            Ok(())
        })
    }

    fn entries(&self, prefix: &[&str]) -> Result<Vec<Entry>> {
        let rows: Vec<(String, String)> = self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT path, value FROM config ORDER BY path")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        let mut entries = Vec::new();
        for (path, value) in rows {
            let key = decode_key(&path)?;
            if has_prefix(&key, prefix) {
                entries.push(Entry { key, value });
            }
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}
