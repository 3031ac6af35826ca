// SQLite-backed key-value storage

use crate::storage::{Storage, validate_key};
use crate::task::now_ms;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value items in a single SQLite table
pub struct SqliteStorage {
    db: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Open or create `<path>/.tasklist/tasklist.db`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().join(".tasklist");
        fs::create_dir_all(&base_path).context("Failed to create storage directory")?;

        let db_path = base_path.join("tasklist.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let storage = Self {
            db,
            db_path: Some(db_path),
        };
        storage.create_schema()?;
        storage.create_gitignore(&base_path)?;

        Ok(storage)
    }

    /// Storage that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let storage = Self { db, db_path: None };
        storage.create_schema()?;
        Ok(storage)
    }

    /// Path of the database file, `None` for in-memory storage
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating storage schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_items (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn create_gitignore(&self, base_path: &Path) -> Result<()> {
        let gitignore_path = base_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "tasklist.db\ntasklist.db-shm\ntasklist.db-wal\n")?;
        }
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let value = self
            .db
            .query_row("SELECT value FROM kv_items WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .context("Failed to read storage item")?;

        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        self.db
            .execute(
                "INSERT OR REPLACE INTO kv_items (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, now_ms()],
            )
            .context("Failed to write storage item")?;

        debug!(key, bytes = value.len(), "Wrote storage item");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.db.execute("DELETE FROM kv_items WHERE key = ?1", [key])?;
        Ok(())
    }
}
