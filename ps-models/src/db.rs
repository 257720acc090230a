//! Database initialization, connection pooling, and lifecycle management.
//!
//! Uses SQLite (optionally in WAL mode) with r2d2 connection pooling. Opening
//! the database creates the schema; sample data is seeded separately through
//! [`Database::seed`].

use std::path::Path;
use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{error, info, warn};

use ps_core::config::DatabaseConfig;
use ps_core::error::{PsError, PsResult};

use crate::models::now_millis;
use crate::schema;
use crate::seed::{self, SeedReport};

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database wrapper providing initialization, pooling, and lifecycle management.
#[derive(Clone)]
pub struct Database {
    pool: Arc<DbPool>,
}

impl Database {
    /// Open (creating if needed) the database at `db_path`.
    ///
    /// Parent directories are created, the pool is built with per-connection
    /// PRAGMAs, the optional integrity check runs, and missing tables are
    /// created. Any failure here is reported as [`PsError::StoreInit`].
    pub fn init(db_path: &Path, config: &DatabaseConfig) -> PsResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PsError::StoreInit(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }

        info!("opening database at {}", db_path.display());

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_customizer(Box::new(ConnectionCustomizer {
                wal_mode: config.wal_mode,
            }))
            .build(manager)
            .map_err(|e| PsError::StoreInit(e.to_string()))?;

        let db = Self {
            pool: Arc::new(pool),
        };

        if config.integrity_check_on_startup {
            db.run_integrity_check()?;
        }

        {
            let conn = db.conn()?;
            schema::create_tables(&conn)?;
        }

        info!("database ready");
        Ok(db)
    }

    /// Get a connection from the pool.
    pub fn conn(&self) -> PsResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| PsError::Pool(e.to_string()))
    }

    /// Insert sample rows into every empty table.
    pub fn seed(&self) -> PsResult<SeedReport> {
        let mut conn = self.conn()?;
        seed::seed_defaults(&mut conn, now_millis())
    }

    /// Run a SQLite integrity check.
    pub fn run_integrity_check(&self) -> PsResult<()> {
        let conn = self.conn()?;
        let result: String = conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))
            .map_err(|e| PsError::Query(e.to_string()))?;

        if result != "ok" {
            error!("database integrity check failed: {result}");
            return Err(PsError::IntegrityCheck(result));
        }

        info!("database integrity check passed");
        Ok(())
    }

    /// Execute a function within a database transaction.
    pub fn transaction<T, F>(&self, f: F) -> PsResult<T>
    where
        F: FnOnce(&Connection) -> PsResult<T>,
    {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| PsError::Query(e.to_string()))?;

        let result = f(&tx)?;

        tx.commit().map_err(|e| PsError::Query(e.to_string()))?;

        Ok(result)
    }

    /// Row counts per table.
    pub fn stats(&self) -> PsResult<DatabaseStats> {
        let conn = self.conn()?;

        let count = |table: &str| -> PsResult<i64> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            conn.query_row(&sql, [], |row| row.get(0))
                .map_err(|e| PsError::Query(e.to_string()))
        };

        Ok(DatabaseStats {
            messages: count("messages")?,
            contacts: count("contacts")?,
            settings: count("settings")?,
            notifications: count("notifications")?,
            app_usage: count("app_usage")?,
        })
    }

    /// Drop and recreate every table, then re-seed the sample data.
    pub fn reset(&self) -> PsResult<SeedReport> {
        warn!("resetting database - all data will be lost");
        self.transaction(|conn| {
            schema::drop_tables(conn)?;
            schema::create_tables(conn)
        })?;
        let report = self.seed()?;
        info!("database reset complete");
        Ok(report)
    }
}

/// Database row count statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub messages: i64,
    pub contacts: i64,
    pub settings: i64,
    pub notifications: i64,
    pub app_usage: i64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "messages={}, contacts={}, settings={}, notifications={}, app_usage={}",
            self.messages, self.contacts, self.settings, self.notifications, self.app_usage
        )
    }
}

/// r2d2 connection customizer that applies PRAGMA settings.
#[derive(Debug)]
struct ConnectionCustomizer {
    wal_mode: bool,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        if self.wal_mode {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }

        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA busy_timeout=5000;",
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::Notification;
    use tempfile::TempDir;

    fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let db = Database::init(&path, &DatabaseConfig::default()).unwrap();
        (db, dir)
    }

    #[test]
    fn test_init_creates_empty_tables() {
        let (db, _dir) = test_db();
        let stats = db.stats().unwrap();
        assert_eq!(stats.messages, 0);
        assert_eq!(stats.app_usage, 0);
    }

    #[test]
    fn test_seed_then_stats() {
        let (db, _dir) = test_db();
        db.seed().unwrap();
        db.seed().unwrap();
        let stats = db.stats().unwrap();
        assert_eq!(
            (stats.contacts, stats.messages, stats.settings, stats.notifications),
            (3, 3, 4, 3)
        );
    }

    #[test]
    fn test_integrity_check() {
        let (db, _dir) = test_db();
        assert!(db.run_integrity_check().is_ok());
    }

    #[test]
    fn test_transaction() {
        let (db, _dir) = test_db();
        let result = db.transaction(|conn| {
            conn.execute(
                "INSERT INTO contacts (name, phone) VALUES (?1, ?2)",
                rusqlite::params!["Dana", "555"],
            )
            .map_err(|e| PsError::Query(e.to_string()))?;
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(db.stats().unwrap().contacts, 1);
    }

    #[test]
    fn test_reset_restores_samples() {
        let (db, _dir) = test_db();
        db.seed().unwrap();
        {
            let conn = db.conn().unwrap();
            Notification::clear_all(&conn).unwrap();
            conn.execute("INSERT INTO contacts (name, phone) VALUES ('Extra', '1')", [])
                .unwrap();
        }
        db.reset().unwrap();
        let stats = db.stats().unwrap();
        assert_eq!(stats.contacts, 3);
        assert_eq!(stats.notifications, 3);
    }

    #[test]
    fn test_init_fails_for_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let err = Database::init(&blocker.join("db.sqlite"), &DatabaseConfig::default())
            .err()
            .unwrap();
        assert!(err.is_store_unavailable());
    }
}
