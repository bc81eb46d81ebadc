//! Bot registration database operations

use rusqlite::{Result as SqliteResult, Row};

use crate::db::{from_db_timestamp, to_db_timestamp};
use crate::models::Bot;
use super::super::Database;

const BOT_COLUMNS: &str = "id, token, username, client_name, channel_id, channel_name, \
                           description, is_active, created_at, last_active";

fn bot_from_row(row: &Row) -> SqliteResult<Bot> {
    let created_at: String = row.get(8)?;
    let last_active: String = row.get(9)?;

    Ok(Bot {
        id: row.get(0)?,
        token: row.get(1)?,
        username: row.get(2)?,
        client_name: row.get(3)?,
        channel_id: row.get(4)?,
        channel_name: row.get(5)?,
        description: row.get(6)?,
        is_active: row.get::<_, i64>(7)? != 0,
        created_at: from_db_timestamp(8, &created_at)?,
        last_active: from_db_timestamp(9, &last_active)?,
    })
}

impl Database {
    /// Insert a fully populated bot. A duplicate token or id fails with a
    /// constraint error and leaves the table untouched.
    pub fn insert_bot(&self, bot: &Bot) -> SqliteResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO bots ({BOT_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            rusqlite::params![
                bot.id,
                bot.token,
                bot.username,
                bot.client_name,
                bot.channel_id,
                bot.channel_name,
                bot.description,
                bot.is_active,
                to_db_timestamp(&bot.created_at),
                to_db_timestamp(&bot.last_active),
            ],
        )?;
        Ok(())
    }

    /// List all bots, most recently created first
    pub fn list_bots(&self) -> SqliteResult<Vec<Bot>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOT_COLUMNS} FROM bots ORDER BY created_at DESC, rowid DESC"
        ))?;

        let bots = stmt
            .query_map([], bot_from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(bots)
    }

    pub fn count_active_bots(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM bots WHERE is_active = 1", [], |row| row.get(0))
    }
}
