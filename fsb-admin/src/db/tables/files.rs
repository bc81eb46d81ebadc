//! File record database operations

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Result as SqliteResult, Row};

use crate::db::{from_db_timestamp, to_db_timestamp};
use crate::models::{FilePage, FileRecord};
use super::super::Database;

const FILE_COLUMNS: &str = "id, bot_id, file_id, file_name, file_size, file_type, \
                            download_url, created_at, expires_at, download_count";

fn file_from_row(row: &Row) -> SqliteResult<FileRecord> {
    let created_at: String = row.get(7)?;
    let expires_at: String = row.get(8)?;

    Ok(FileRecord {
        id: row.get(0)?,
        bot_id: row.get(1)?,
        file_id: row.get(2)?,
        file_name: row.get(3)?,
        file_size: row.get(4)?,
        file_type: row.get(5)?,
        download_url: row.get(6)?,
        created_at: from_db_timestamp(7, &created_at)?,
        expires_at: from_db_timestamp(8, &expires_at)?,
        download_count: row.get(9)?,
    })
}

impl Database {
    /// Insert a file record. Fails with a constraint error if `bot_id`
    /// does not reference an existing bot.
    pub fn insert_file(&self, file: &FileRecord) -> SqliteResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO files ({FILE_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            rusqlite::params![
                file.id,
                file.bot_id,
                file.file_id,
                file.file_name,
                file.file_size,
                file.file_type,
                file.download_url,
                to_db_timestamp(&file.created_at),
                to_db_timestamp(&file.expires_at),
                file.download_count,
            ],
        )?;
        Ok(())
    }

    /// One page of files, most recently created first
    pub fn list_files(&self, page: FilePage) -> SqliteResult<Vec<FileRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {FILE_COLUMNS} FROM files \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
        ))?;

        let files = stmt
            .query_map([page.limit, page.offset], file_from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(files)
    }

    pub fn count_files(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
    }

    /// Files whose link is still valid at `now` (expiry strictly later)
    pub fn count_active_links(&self, now: &DateTime<Utc>) -> SqliteResult<i64> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COUNT(*) FROM files WHERE expires_at > ?1",
            [to_db_timestamp(now)],
            |row| row.get(0),
        )
    }

    /// Bump the download counter; returns the new count, or None if no
    /// file has that id.
    pub fn increment_download_count(&self, file_id: &str) -> SqliteResult<Option<i64>> {
        let conn = self.conn.lock();
        conn.query_row(
            "UPDATE files SET download_count = download_count + 1 \
             WHERE id = ?1 RETURNING download_count",
            [file_id],
            |row| row.get(0),
        )
        .optional()
    }
}
