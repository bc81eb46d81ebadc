//! Key/value settings database operations

use rusqlite::{OptionalExtension, Result as SqliteResult};

use crate::models::Setting;
use super::super::Database;

impl Database {
    pub fn list_settings(&self) -> SqliteResult<Vec<Setting>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;

        let settings = stmt
            .query_map([], |row| {
                Ok(Setting {
                    key: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(settings)
    }

    pub fn get_setting(&self, key: &str) -> SqliteResult<Option<String>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
            .optional()
    }

    /// Insert or replace a setting value
    pub fn upsert_setting(&self, key: &str, value: &str) -> SqliteResult<Setting> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(Setting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_seeded_in_key_order() {
        let db = Database::open_in_memory().unwrap();
        let keys: Vec<String> = db.list_settings().unwrap().into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["cache_time_minutes", "max_cache_size_gb", "max_file_size_mb"]);
    }

    #[test]
    fn test_upsert_and_get() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_setting("theme").unwrap(), None);

        db.upsert_setting("theme", "dark").unwrap();
        db.upsert_setting("theme", "light").unwrap();

        assert_eq!(db.get_setting("theme").unwrap().as_deref(), Some("light"));
        assert_eq!(db.list_settings().unwrap().len(), 4);
    }
}
