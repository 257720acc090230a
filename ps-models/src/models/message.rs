//! Message entity model.

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use ps_core::error::{PsError, PsResult};

/// A text message shown in the messages app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender: String,
    pub content: String,
    /// Milliseconds since the Unix epoch at insert time.
    pub timestamp: i64,
    pub is_read: bool,
}

impl Message {
    /// Construct a Message from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            sender: row.get("sender")?,
            content: row.get("content")?,
            timestamp: row.get("timestamp")?,
            is_read: row.get("is_read")?,
        })
    }

    /// Insert a new unread message and return the stored record.
    pub fn insert(conn: &Connection, sender: &str, content: &str, timestamp: i64) -> PsResult<Self> {
        conn.execute(
            "INSERT INTO messages (sender, content, timestamp, is_read) VALUES (?1, ?2, ?3, 0)",
            params![sender, content, timestamp],
        )
        .map_err(|e| PsError::Query(e.to_string()))?;

        Ok(Self {
            id: conn.last_insert_rowid(),
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp,
            is_read: false,
        })
    }

    /// All messages, newest first.
    pub fn list_newest_first(conn: &Connection) -> PsResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM messages ORDER BY timestamp DESC, id DESC")
            .map_err(|e| PsError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::from_row)
            .map_err(|e| PsError::Query(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(rows)
    }

    /// Set the read flag. Returns whether a row matched `id`.
    pub fn mark_read(conn: &Connection, id: i64) -> PsResult<bool> {
        let changed = conn
            .execute("UPDATE messages SET is_read = 1 WHERE id = ?1", [id])
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(changed > 0)
    }
}
