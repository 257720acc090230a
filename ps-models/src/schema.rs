//! Database schema definitions and table creation.
//!
//! Five flat tables, one per record kind. There is no migration system:
//! tables are created if absent and dropped wholesale on reset.

use rusqlite::Connection;
use ps_core::error::{PsError, PsResult};
use tracing::info;

/// Every table owned by the store, in creation order.
pub const TABLES: [&str; 5] = ["messages", "contacts", "settings", "notifications", "app_usage"];

/// Create all database tables and indexes if they do not exist.
pub fn create_tables(conn: &Connection) -> PsResult<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| PsError::StoreInit(format!("failed to create schema: {e}")))?;
    info!("database schema verified");
    Ok(())
}

/// Drop all tables (used for database reset).
pub fn drop_tables(conn: &Connection) -> PsResult<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS app_usage;
         DROP TABLE IF EXISTS notifications;
         DROP TABLE IF EXISTS settings;
         DROP TABLE IF EXISTS contacts;
         DROP TABLE IF EXISTS messages;",
    )
    .map_err(|e| PsError::Query(format!("failed to drop tables: {e}")))?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    sender      TEXT NOT NULL,
    content     TEXT NOT NULL,
    timestamp   INTEGER NOT NULL,
    is_read     INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS contacts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    phone       TEXT NOT NULL,
    avatar      TEXT
);

CREATE TABLE IF NOT EXISTS settings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    key         TEXT NOT NULL UNIQUE,
    value       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    body        TEXT NOT NULL,
    app_name    TEXT NOT NULL,
    timestamp   INTEGER NOT NULL,
    is_read     INTEGER NOT NULL DEFAULT 0,
    type        TEXT NOT NULL DEFAULT 'system'
);

-- app_name is unique so usage updates are a true upsert
CREATE TABLE IF NOT EXISTS app_usage (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    app_name    TEXT NOT NULL UNIQUE,
    usage_time  INTEGER NOT NULL DEFAULT 0,
    last_used   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(name);
CREATE INDEX IF NOT EXISTS idx_settings_key ON settings(key);
CREATE INDEX IF NOT EXISTS idx_notifications_timestamp ON notifications(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_notifications_is_read ON notifications(is_read);
CREATE INDEX IF NOT EXISTS idx_app_usage_last_used ON app_usage(last_used DESC);
"#;
