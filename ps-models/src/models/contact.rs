//! Contact entity model.

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use ps_core::error::{PsError, PsResult};

/// An address book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// Optional avatar reference (URI or asset name).
    pub avatar: Option<String>,
}

impl Contact {
    /// Construct a Contact from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            avatar: row.get("avatar")?,
        })
    }

    /// Insert a new contact and return the stored record.
    pub fn insert(conn: &Connection, name: &str, phone: &str, avatar: Option<&str>) -> PsResult<Self> {
        conn.execute(
            "INSERT INTO contacts (name, phone, avatar) VALUES (?1, ?2, ?3)",
            params![name, phone, avatar],
        )
        .map_err(|e| PsError::Query(e.to_string()))?;

        Ok(Self {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            phone: phone.to_string(),
            avatar: avatar.map(String::from),
        })
    }

    /// All contacts sorted by name.
    pub fn list_by_name(conn: &Connection) -> PsResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM contacts ORDER BY name ASC, id ASC")
            .map_err(|e| PsError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::from_row)
            .map_err(|e| PsError::Query(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(rows)
    }

    // ─── Display helpers ─────────────────────────────────────────────────

    /// First letter of every word in the name, upper-cased ("Alice Johnson" -> "AJ").
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }

    /// Whether this contact matches a search query.
    ///
    /// The name is compared case-insensitively; the phone number is matched
    /// as a raw substring. A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query.to_lowercase()) || self.phone.contains(query)
    }
}
