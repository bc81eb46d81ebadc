//! SQLite database - schema definitions and connection management
//!
//! This file contains:
//! - Database struct definition
//! - Connection management (new, open_in_memory)
//! - Schema creation and default settings seeding
//!
//! Table operations live in the tables/ subdirectory.

use parking_lot::Mutex;
use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::time::Duration;

use crate::error::AdminError;
use crate::models::DEFAULT_SETTINGS;

/// Single connection shared by all handlers and live-update tasks
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open the database file and initialize the schema.
    ///
    /// Fails with [`AdminError::Startup`] if the schema cannot be created.
    pub fn new(database_url: &str) -> Result<Self, AdminError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AdminError::Startup(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(database_url).map_err(|e| AdminError::Startup(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, AdminError> {
        let conn = Connection::open_in_memory().map_err(|e| AdminError::Startup(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, AdminError> {
        conn.pragma_update(None, "foreign_keys", true)
            .and_then(|_| conn.busy_timeout(Duration::from_secs(5)))
            .map_err(|e| AdminError::Startup(e.to_string()))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init().map_err(|e| AdminError::Startup(e.to_string()))?;
        Ok(db)
    }

    /// Create tables if absent and seed default settings.
    ///
    /// Safe to run on every start: seeding never overwrites existing values.
    pub fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock();

        // Registered bot instances
        conn.execute(
            "CREATE TABLE IF NOT EXISTS bots (
                id TEXT PRIMARY KEY,
                token TEXT UNIQUE NOT NULL,
                username TEXT NOT NULL DEFAULT '',
                client_name TEXT NOT NULL DEFAULT '',
                channel_id TEXT NOT NULL,
                channel_name TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                last_active TEXT NOT NULL
            )",
            [],
        )?;

        // Processed files and their download links
        conn.execute(
            "CREATE TABLE IF NOT EXISTS files (
                id TEXT PRIMARY KEY,
                bot_id TEXT NOT NULL,
                file_id TEXT NOT NULL,
                file_name TEXT NOT NULL DEFAULT '',
                file_size INTEGER NOT NULL DEFAULT 0,
                file_type TEXT NOT NULL DEFAULT '',
                download_url TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                download_count INTEGER NOT NULL DEFAULT 0 CHECK (download_count >= 0),
                FOREIGN KEY (bot_id) REFERENCES bots(id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_bots_created_at ON bots(created_at)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_files_created_at ON files(created_at)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_files_expires_at ON files(expires_at)",
            [],
        )?;

        for (key, value) in DEFAULT_SETTINGS {
            conn.execute(
                "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
                [key, value],
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(db: &Database) -> Vec<String> {
        let conn = db.conn.lock();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<SqliteResult<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_init_creates_tables() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(table_names(&db), vec!["bots", "files", "settings"]);
    }

    #[test]
    fn test_init_twice_keeps_existing_values() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_setting("cache_time_minutes", "60").unwrap();

        db.init().unwrap();
        db.init().unwrap();

        let settings = db.list_settings().unwrap();
        assert_eq!(settings.len(), 3);
        assert_eq!(db.get_setting("cache_time_minutes").unwrap().as_deref(), Some("60"));
        assert_eq!(db.get_setting("max_cache_size_gb").unwrap().as_deref(), Some("10"));
        assert_eq!(db.get_setting("max_file_size_mb").unwrap().as_deref(), Some("100"));
    }

    #[test]
    fn test_reopen_file_database_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("admin.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new(path).unwrap();
            db.upsert_setting("max_file_size_mb", "2048").unwrap();
        }

        let db = Database::new(path).unwrap();
        assert_eq!(db.list_settings().unwrap().len(), 3);
        assert_eq!(db.get_setting("max_file_size_mb").unwrap().as_deref(), Some("2048"));
    }

    #[test]
    fn test_unusable_path_is_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file
        let result = Database::new(dir.path().to_str().unwrap());
        assert!(matches!(result, Err(AdminError::Startup(_))));
    }
}
