//! Phone Simulator Models - Database schema, models, and default-data seeding.
//!
//! This crate owns the relational persistence path: SQLite initialization and
//! pooling, the five entity models (messages, contacts, settings,
//! notifications, app usage), and the one-time sample data inserted into
//! empty tables.

pub mod db;
pub mod schema;
pub mod models;
pub mod seed;

// Re-export key types
pub use db::{Database, DatabaseStats};
pub use models::message::Message;
pub use models::contact::Contact;
pub use models::setting::{Setting, Settings};
pub use models::notification::{AppUnreadCount, Notification, NotificationKind};
pub use models::app_usage::AppUsage;
pub use seed::SeedReport;
