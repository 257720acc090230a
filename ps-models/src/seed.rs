//! Default sample data inserted into empty tables.
//!
//! Seeding is per table: a table receives its sample rows only when it holds
//! zero rows, so relaunching never duplicates data and a table the user has
//! emptied (e.g. cleared notifications) is refilled on the next launch.

use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use ps_core::constants::{app_names, setting_defaults};
use ps_core::error::{PsError, PsResult};

use crate::models::contact::Contact;
use crate::models::message::Message;
use crate::models::notification::{Notification, NotificationKind};
use crate::models::setting::Settings;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

const SAMPLE_CONTACTS: [(&str, &str); 3] = [
    ("Alice Johnson", "+1 (555) 123-4567"),
    ("Bob Smith", "+1 (555) 987-6543"),
    ("Carol Davis", "+1 (555) 456-7890"),
];

/// `(sender, content, age in ms)`
const SAMPLE_MESSAGES: [(&str, &str, i64); 3] = [
    ("Alice Johnson", "Hey! How are you doing?", HOUR_MS),
    ("Bob Smith", "Don't forget about our meeting tomorrow!", 30 * MINUTE_MS),
    ("Carol Davis", "Thanks for your help yesterday 😊", 15 * MINUTE_MS),
];

/// `(title, body, app, kind, age in ms)`
const SAMPLE_NOTIFICATIONS: [(&str, &str, &str, NotificationKind, i64); 3] = [
    (
        "New Message",
        "Alice Johnson: Hey! How are you doing?",
        app_names::MESSAGES,
        NotificationKind::Message,
        HOUR_MS,
    ),
    (
        "System Update",
        "Your phone simulator has been updated to version 1.0.1",
        app_names::SYSTEM,
        NotificationKind::System,
        2 * HOUR_MS,
    ),
    (
        "Contact Added",
        "Bob Smith has been added to your contacts",
        app_names::CONTACTS,
        NotificationKind::App,
        3 * HOUR_MS,
    ),
];

/// Rows inserted by one seeding pass, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub contacts: usize,
    pub messages: usize,
    pub settings: usize,
    pub notifications: usize,
}

impl SeedReport {
    /// Whether any table was filled.
    pub fn seeded_anything(&self) -> bool {
        self.contacts + self.messages + self.settings + self.notifications > 0
    }
}

/// Fill every empty table with its sample rows in a single transaction.
///
/// `now` is the wall-clock time in milliseconds the sample ages are relative to.
pub fn seed_defaults(conn: &mut Connection, now: i64) -> PsResult<SeedReport> {
    let tx = conn
        .transaction()
        .map_err(|e| PsError::Query(e.to_string()))?;
    let mut report = SeedReport::default();

    if is_empty(&tx, "contacts")? {
        for (name, phone) in SAMPLE_CONTACTS {
            Contact::insert(&tx, name, phone, None)?;
        }
        report.contacts = SAMPLE_CONTACTS.len();
    }

    if is_empty(&tx, "messages")? {
        for (sender, content, age) in SAMPLE_MESSAGES {
            Message::insert(&tx, sender, content, now - age)?;
        }
        report.messages = SAMPLE_MESSAGES.len();
    }

    if is_empty(&tx, "settings")? {
        Settings::set_many(&tx, setting_defaults::PAIRS)?;
        report.settings = setting_defaults::PAIRS.len();
    }

    if is_empty(&tx, "notifications")? {
        for (title, body, app, kind, age) in SAMPLE_NOTIFICATIONS {
            Notification::insert(&tx, title, body, app, kind, now - age)?;
        }
        report.notifications = SAMPLE_NOTIFICATIONS.len();
    }

    tx.commit().map_err(|e| PsError::Query(e.to_string()))?;

    if report.seeded_anything() {
        info!(?report, "seeded default data");
    } else {
        debug!("all tables populated, nothing to seed");
    }
    Ok(report)
}

fn is_empty(conn: &Connection, table: &str) -> PsResult<bool> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count: i64 = conn
        .query_row(&sql, [], |row| row.get(0))
        .map_err(|e| PsError::Query(e.to_string()))?;
    Ok(count == 0)
}
