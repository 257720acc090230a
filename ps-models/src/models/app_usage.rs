//! Per-app usage tracking.

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use ps_core::error::{PsError, PsResult};

/// Accumulated usage for one app, keyed by app name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUsage {
    pub id: i64,
    pub app_name: String,
    pub usage_time: i64,
    /// Milliseconds since the Unix epoch of the last update.
    pub last_used: i64,
}

impl AppUsage {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            app_name: row.get("app_name")?,
            usage_time: row.get("usage_time")?,
            last_used: row.get("last_used")?,
        })
    }

    /// Insert or replace the usage row for `app_name`.
    pub fn upsert(conn: &Connection, app_name: &str, usage_time: i64, last_used: i64) -> PsResult<()> {
        conn.execute(
            "INSERT INTO app_usage (app_name, usage_time, last_used) VALUES (?1, ?2, ?3)
             ON CONFLICT(app_name) DO UPDATE SET
                usage_time = excluded.usage_time,
                last_used = excluded.last_used",
            params![app_name, usage_time, last_used],
        )
        .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(())
    }

    /// All usage rows, most recently used first.
    pub fn list_recent_first(conn: &Connection) -> PsResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM app_usage ORDER BY last_used DESC, id DESC")
            .map_err(|e| PsError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::from_row)
            .map_err(|e| PsError::Query(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(rows)
    }
}
