//! Notification entity model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use rusqlite::{params, Connection, Row};
use ps_core::error::{PsError, PsResult};

/// Category of a notification, stored in the `type` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Message,
    #[default]
    System,
    App,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Message => "message",
            NotificationKind::System => "system",
            NotificationKind::App => "app",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = PsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "message" => Ok(NotificationKind::Message),
            "system" => Ok(NotificationKind::System),
            "app" => Ok(NotificationKind::App),
            other => Err(PsError::validation(format!("unknown notification type: {other}"))),
        }
    }
}

/// A notification shown in the status bar and the notifications app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub app_name: String,
    /// Milliseconds since the Unix epoch at insert time.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
}

/// Unread notifications grouped under one app name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUnreadCount {
    pub app_name: String,
    pub count: i64,
}

impl Notification {
    /// Construct a Notification from a database row.
    ///
    /// Unrecognised `type` values read back as [`NotificationKind::System`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let kind: String = row.get("type")?;
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            body: row.get("body")?,
            app_name: row.get("app_name")?,
            timestamp: row.get("timestamp")?,
            kind: kind.parse().unwrap_or_default(),
            is_read: row.get("is_read")?,
        })
    }

    /// Insert a new unread notification and return the stored record.
    pub fn insert(
        conn: &Connection,
        title: &str,
        body: &str,
        app_name: &str,
        kind: NotificationKind,
        timestamp: i64,
    ) -> PsResult<Self> {
        conn.execute(
            "INSERT INTO notifications (title, body, app_name, timestamp, is_read, type)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![title, body, app_name, timestamp, kind.as_str()],
        )
        .map_err(|e| PsError::Query(e.to_string()))?;

        Ok(Self {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            body: body.to_string(),
            app_name: app_name.to_string(),
            timestamp,
            kind,
            is_read: false,
        })
    }

    /// All notifications, newest first.
    pub fn list_newest_first(conn: &Connection) -> PsResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM notifications ORDER BY timestamp DESC, id DESC")
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
            .execute("UPDATE notifications SET is_read = 1 WHERE id = ?1", [id])
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Delete one notification. Returns whether a row was removed.
    pub fn delete(conn: &Connection, id: i64) -> PsResult<bool> {
        let changed = conn
            .execute("DELETE FROM notifications WHERE id = ?1", [id])
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(changed > 0)
    }

    /// Delete every notification, returning how many rows were removed.
    pub fn clear_all(conn: &Connection) -> PsResult<usize> {
        conn.execute("DELETE FROM notifications", [])
            .map_err(|e| PsError::Query(e.to_string()))
    }

    /// Number of unread notifications.
    pub fn count_unread(conn: &Connection) -> PsResult<i64> {
        conn.query_row("SELECT COUNT(*) FROM notifications WHERE is_read = 0", [], |row| row.get(0))
            .map_err(|e| PsError::Query(e.to_string()))
    }

    /// Unread notifications grouped by app, most recently notified app first.
    pub fn unread_by_app(conn: &Connection) -> PsResult<Vec<AppUnreadCount>> {
        let mut stmt = conn
            .prepare(
                "SELECT app_name, COUNT(*) AS count, MAX(timestamp) AS latest
                 FROM notifications
                 WHERE is_read = 0
                 GROUP BY app_name
                 ORDER BY latest DESC, app_name ASC",
            )
            .map_err(|e| PsError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AppUnreadCount {
                    app_name: row.get(0)?,
                    count: row.get(1)?,
                })
            })
            .map_err(|e| PsError::Query(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| PsError::Query(e.to_string()))?;
        Ok(rows)
    }
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
    fn test_kind_parse() {
        assert_eq!("message".parse::<NotificationKind>().unwrap(), NotificationKind::Message);
        assert_eq!("APP".parse::<NotificationKind>().unwrap(), NotificationKind::App);
        assert!("bogus".parse::<NotificationKind>().is_err());
        assert_eq!(NotificationKind::default(), NotificationKind::System);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationKind::Message).unwrap();
        assert_eq!(json, "\"message\"");
    }

    #[test]
    fn test_insert_and_list() {
        let conn = conn();
        let n = Notification::insert(&conn, "Hi", "body", "Messages", NotificationKind::Message, 10).unwrap();
        assert!(!n.is_read);

        let all = Notification::list_newest_first(&conn).unwrap();
        assert_eq!(all, vec![n]);
    }

    #[test]
    fn test_unknown_type_reads_as_system() {
        let conn = conn();
        conn.execute(
            "INSERT INTO notifications (title, body, app_name, timestamp, type) VALUES ('t', 'b', 'X', 1, 'weird')",
            [],
        )
        .unwrap();
        let all = Notification::list_newest_first(&conn).unwrap();
        assert_eq!(all[0].kind, NotificationKind::System);
    }

    #[test]
    fn test_clear_all_and_counts() {
        let conn = conn();
        for i in 0..3 {
            Notification::insert(&conn, "t", "b", "System", NotificationKind::System, i).unwrap();
        }
        assert_eq!(Notification::count_unread(&conn).unwrap(), 3);
        assert_eq!(Notification::clear_all(&conn).unwrap(), 3);
        assert_eq!(Notification::count_unread(&conn).unwrap(), 0);
        assert!(Notification::list_newest_first(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_unread_by_app_groups_and_orders() {
        let conn = conn();
        Notification::insert(&conn, "a", "b", "System", NotificationKind::System, 100).unwrap();
        Notification::insert(&conn, "a", "b", "Messages", NotificationKind::Message, 300).unwrap();
        Notification::insert(&conn, "a", "b", "Messages", NotificationKind::Message, 200).unwrap();
        let read = Notification::insert(&conn, "a", "b", "Contacts", NotificationKind::App, 400).unwrap();
        Notification::mark_read(&conn, read.id).unwrap();

        let groups = Notification::unread_by_app(&conn).unwrap();
        assert_eq!(
            groups,
            vec![
                AppUnreadCount { app_name: "Messages".into(), count: 2 },
                AppUnreadCount { app_name: "System".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_delete() {
        let conn = conn();
        let n = Notification::insert(&conn, "t", "b", "X", NotificationKind::App, 1).unwrap();
        assert!(Notification::delete(&conn, n.id).unwrap());
        assert!(!Notification::delete(&conn, n.id).unwrap());
    }
}
