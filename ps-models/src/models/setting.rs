//! Settings key-value table with typed accessors.
//!
//! Each setting is stored as a TEXT value under a unique key; writes are
//! upserts so a key never appears twice.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use ps_core::error::{PsError, PsResult};

/// A single row of the `settings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: i64,
    pub key: String,
    pub value: String,
}

impl Setting {
    /// Construct a Setting from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            key: row.get("key")?,
            value: row.get("value")?,
        })
    }
}

/// Settings key-value store backed by the `settings` table.
pub struct Settings;

impl Settings {
    /// Get a raw string value for a key.
    pub fn get(conn: &Connection, key: &str) -> PsResult<Option<String>> {
        match conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(PsError::Query(e.to_string())),
        }
    }

    /// Set a raw string value for a key (upsert). The row id is preserved on update.
    pub fn set(conn: &Connection, key: &str, value: &str) -> PsResult<()> {
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(())
    }

    fn rows(conn: &Connection) -> PsResult<Vec<Setting>> {
        let mut stmt = conn
            .prepare("SELECT * FROM settings ORDER BY key ASC")
            .map_err(|e| PsError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], Setting::from_row)
            .map_err(|e| PsError::Query(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(rows)
    }

    /// Get all settings as an ordered map.
    pub fn get_all(conn: &Connection) -> PsResult<BTreeMap<String, String>> {
        Ok(Self::rows(conn)?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect())
    }

    /// Set multiple settings at once (batch upsert).
    pub fn set_many(conn: &Connection, entries: &[(&str, &str)]) -> PsResult<()> {
        let mut stmt = conn
            .prepare(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .map_err(|e| PsError::Query(e.to_string()))?;

        for (key, value) in entries {
            stmt.execute(params![key, value])
                .map_err(|e| PsError::Query(e.to_string()))?;
        }
        Ok(())
    }
}

/// Interpret a stored setting value as a boolean.
pub fn parse_bool(value: &str) -> bool {
    value == "true" || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_get_missing() {
        let conn = conn();
        assert_eq!(Settings::get(&conn, "nope").unwrap(), None);
    }

    #[test]
    fn test_upsert_keeps_single_row() {
        let conn = conn();
        for i in 0..5 {
            Settings::set(&conn, "theme", &format!("v{i}")).unwrap();
        }
        let rows = Settings::rows(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "v4");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("TRUE "));
    }

    #[test]
    fn test_set_many_and_get_all() {
        let conn = conn();
        Settings::set_many(&conn, &[("b", "2"), ("a", "1")]).unwrap();
        let all = Settings::get_all(&conn).unwrap();
        assert_eq!(all.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
