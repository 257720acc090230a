//! Persistence facade over the SQLite store.
//!
//! `PhoneStore` is the single entry point screens use for durable state. It
//! opens the database lazily on first use, seeds sample data into empty
//! tables, runs every query on the blocking pool, and announces each
//! successful mutation on the event bus.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use ps_core::config::DatabaseConfig;
use ps_core::error::{PsError, PsResult};
use ps_models::models::now_millis;
use ps_models::{
    AppUnreadCount, AppUsage, Contact, Database, DatabaseStats, Message, Notification,
    NotificationKind, SeedReport, Settings,
};

use crate::event_bus::{AppEvent, EventBus};
use crate::service::{Service, ServiceState, StateCell};

/// Typed async access to messages, contacts, settings, notifications and
/// app usage.
///
/// Every accessor initializes the store implicitly. Initialization is
/// serialized behind a mutex, so concurrent first calls open the database
/// exactly once; a failed attempt leaves the store closed and the next call
/// tries again.
pub struct PhoneStore {
    db_path: PathBuf,
    db_config: DatabaseConfig,
    event_bus: EventBus,
    db: Mutex<Option<Database>>,
    state: StateCell,
}

impl PhoneStore {
    /// Create a closed store. Nothing touches the disk until the first call.
    pub fn new(db_path: impl Into<PathBuf>, db_config: DatabaseConfig, event_bus: EventBus) -> Self {
        Self {
            db_path: db_path.into(),
            db_config,
            event_bus,
            db: Mutex::new(None),
            state: StateCell::new(),
        }
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Bus the store announces mutations on.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Whether the database is currently open.
    pub async fn is_initialized(&self) -> bool {
        self.db.lock().await.is_some()
    }

    /// Open the database and seed defaults. A no-op once open.
    pub async fn init(&self) -> PsResult<()> {
        self.database().await.map(|_| ())
    }

    /// Close the database. The next access re-initializes.
    pub async fn close(&self) {
        let mut guard = self.db.lock().await;
        if guard.take().is_some() {
            self.state.set(ServiceState::Stopped);
            info!("phone store closed");
        }
    }

    async fn database(&self) -> PsResult<Database> {
        let mut guard = self.db.lock().await;
        if let Some(db) = guard.as_ref() {
            return Ok(db.clone());
        }

        self.state.set(ServiceState::Initializing);
        let path = self.db_path.clone();
        let config = self.db_config.clone();
        let opened = tokio::task::spawn_blocking(move || -> PsResult<(Database, SeedReport)> {
            let db = Database::init(&path, &config)?;
            let report = db.seed().map_err(|e| PsError::StoreInit(e.to_string()))?;
            Ok((db, report))
        })
        .await
        .map_err(|e| PsError::StoreInit(format!("store init task failed: {e}")))
        .and_then(|r| r);

        match opened {
            Ok((db, report)) => {
                *guard = Some(db.clone());
                self.state.set(ServiceState::Running);
                info!(path = %self.db_path.display(), ?report, "phone store initialized");
                self.event_bus.emit(AppEvent::StoreInitialized {
                    seeded_rows: report.contacts
                        + report.messages
                        + report.settings
                        + report.notifications,
                });
                Ok(db)
            }
            Err(e) => {
                self.state.set(ServiceState::Failed);
                error!(path = %self.db_path.display(), "phone store initialization failed: {e}");
                Err(e)
            }
        }
    }

    /// Run `f` against the open database on the blocking pool.
    async fn run<T, F>(&self, op: &'static str, f: F) -> PsResult<T>
    where
        F: FnOnce(&Database) -> PsResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.database().await?;
        let result = tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| PsError::Internal(format!("{op}: blocking task failed: {e}")))?;
        match &result {
            Ok(_) => debug!("{op} ok"),
            Err(e) => error!("{op} failed: {e}"),
        }
        result
    }

    // ─── Messages ───────────────────────────────────────────────────────

    /// All messages, newest first.
    pub async fn get_messages(&self) -> PsResult<Vec<Message>> {
        self.run("get_messages", |db| Message::list_newest_first(&*db.conn()?))
            .await
    }

    /// Insert an unread message stamped with the current time.
    pub async fn add_message(&self, sender: &str, content: &str) -> PsResult<Message> {
        let sender = sender.to_string();
        let content = content.to_string();
        let msg = self
            .run("add_message", move |db| {
                Message::insert(&*db.conn()?, &sender, &content, now_millis())
            })
            .await?;
        self.event_bus.emit(AppEvent::MessageAdded {
            id: msg.id,
            sender: msg.sender.clone(),
        });
        Ok(msg)
    }

    /// Mark a message read. Unknown ids are ignored.
    pub async fn mark_message_as_read(&self, id: i64) -> PsResult<()> {
        let changed = self
            .run("mark_message_as_read", move |db| Message::mark_read(&*db.conn()?, id))
            .await?;
        if changed {
            self.event_bus.emit(AppEvent::MessageRead { id });
        }
        Ok(())
    }

    // ─── Contacts ───────────────────────────────────────────────────────

    /// All contacts sorted by name.
    pub async fn get_contacts(&self) -> PsResult<Vec<Contact>> {
        self.run("get_contacts", |db| Contact::list_by_name(&*db.conn()?))
            .await
    }

    /// Insert a contact.
    pub async fn add_contact(&self, name: &str, phone: &str, avatar: Option<&str>) -> PsResult<Contact> {
        let name = name.to_string();
        let phone = phone.to_string();
        let avatar = avatar.map(String::from);
        let contact = self
            .run("add_contact", move |db| {
                Contact::insert(&*db.conn()?, &name, &phone, avatar.as_deref())
            })
            .await?;
        self.event_bus.emit(AppEvent::ContactAdded {
            id: contact.id,
            name: contact.name.clone(),
        });
        Ok(contact)
    }

    // ─── Settings ───────────────────────────────────────────────────────

    /// Value stored under `key`, if any.
    pub async fn get_setting(&self, key: &str) -> PsResult<Option<String>> {
        let key = key.to_string();
        self.run("get_setting", move |db| Settings::get(&*db.conn()?, &key))
            .await
    }

    /// Upsert `key`. Concurrent writers to one key are last-write-wins.
    pub async fn set_setting(&self, key: &str, value: &str) -> PsResult<()> {
        let (k, v) = (key.to_string(), value.to_string());
        self.run("set_setting", move |db| Settings::set(&*db.conn()?, &k, &v))
            .await?;
        self.event_bus.emit(AppEvent::SettingChanged {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Every setting, ordered by key.
    pub async fn get_all_settings(&self) -> PsResult<BTreeMap<String, String>> {
        self.run("get_all_settings", |db| Settings::get_all(&*db.conn()?))
            .await
    }

    // ─── Notifications ──────────────────────────────────────────────────

    /// All notifications, newest first.
    pub async fn get_notifications(&self) -> PsResult<Vec<Notification>> {
        self.run("get_notifications", |db| Notification::list_newest_first(&*db.conn()?))
            .await
    }

    /// Insert an unread notification stamped with the current time.
    ///
    /// Callers without a specific category pass `NotificationKind::default()`
    /// (`System`).
    pub async fn add_notification(
        &self,
        title: &str,
        body: &str,
        app_name: &str,
        kind: NotificationKind,
    ) -> PsResult<Notification> {
        let (title, body, app) = (title.to_string(), body.to_string(), app_name.to_string());
        let notification = self
            .run("add_notification", move |db| {
                Notification::insert(&*db.conn()?, &title, &body, &app, kind, now_millis())
            })
            .await?;
        self.event_bus.emit(AppEvent::NotificationAdded {
            id: notification.id,
            app_name: notification.app_name.clone(),
            kind: notification.kind,
        });
        Ok(notification)
    }

    /// Mark a notification read. Unknown ids are ignored.
    pub async fn mark_notification_as_read(&self, id: i64) -> PsResult<()> {
        let changed = self
            .run("mark_notification_as_read", move |db| {
                Notification::mark_read(&*db.conn()?, id)
            })
            .await?;
        if changed {
            self.event_bus.emit(AppEvent::NotificationRead { id });
        }
        Ok(())
    }

    /// Delete one notification. Returns whether it existed.
    pub async fn delete_notification(&self, id: i64) -> PsResult<bool> {
        let removed = self
            .run("delete_notification", move |db| Notification::delete(&*db.conn()?, id))
            .await?;
        if removed {
            self.event_bus.emit(AppEvent::NotificationDeleted { id });
        }
        Ok(removed)
    }

    /// Delete every notification, returning how many were removed.
    pub async fn clear_all_notifications(&self) -> PsResult<usize> {
        let removed = self
            .run("clear_all_notifications", |db| Notification::clear_all(&*db.conn()?))
            .await?;
        self.event_bus.emit(AppEvent::NotificationsCleared { removed });
        Ok(removed)
    }

    /// Number of unread notifications.
    pub async fn get_unread_notifications_count(&self) -> PsResult<i64> {
        self.run("get_unread_notifications_count", |db| {
            Notification::count_unread(&*db.conn()?)
        })
        .await
    }

    /// Unread notifications grouped by app, most recently notified first.
    pub async fn unread_notifications_by_app(&self) -> PsResult<Vec<AppUnreadCount>> {
        self.run("unread_notifications_by_app", |db| {
            Notification::unread_by_app(&*db.conn()?)
        })
        .await
    }

    // ─── App usage ──────────────────────────────────────────────────────

    /// Record usage for `app_name`, stamping `last_used` with the current time.
    pub async fn update_app_usage(&self, app_name: &str, usage_time: i64) -> PsResult<()> {
        let app = app_name.to_string();
        self.run("update_app_usage", move |db| {
            AppUsage::upsert(&*db.conn()?, &app, usage_time, now_millis())
        })
        .await?;
        self.event_bus.emit(AppEvent::AppUsageUpdated {
            app_name: app_name.to_string(),
        });
        Ok(())
    }

    /// Usage rows, most recently used first.
    pub async fn get_app_usage(&self) -> PsResult<Vec<AppUsage>> {
        self.run("get_app_usage", |db| AppUsage::list_recent_first(&*db.conn()?))
            .await
    }

    // ─── Maintenance ────────────────────────────────────────────────────

    /// Row counts per table.
    pub async fn stats(&self) -> PsResult<DatabaseStats> {
        self.run("stats", |db| db.stats()).await
    }

    /// Drop every table, recreate the schema and re-seed sample data.
    pub async fn reset(&self) -> PsResult<SeedReport> {
        warn!("resetting phone store");
        let report = self.run("reset", |db| db.reset()).await?;
        self.event_bus.emit(AppEvent::StoreReset);
        Ok(report)
    }

    /// Run a SQLite integrity check.
    pub async fn integrity_check(&self) -> PsResult<()> {
        self.run("integrity_check", |db| db.run_integrity_check()).await
    }
}

#[async_trait]
impl Service for PhoneStore {
    fn name(&self) -> &str {
        "phone_store"
    }

    fn state(&self) -> ServiceState {
        self.state.get()
    }

    async fn init(&self) -> PsResult<()> {
        PhoneStore::init(self).await
    }

    async fn shutdown(&self) -> PsResult<()> {
        self.state.set(ServiceState::ShuttingDown);
        self.close().await;
        self.state.set(ServiceState::Stopped);
        Ok(())
    }
}
