//! Entity model definitions.

pub mod message;
pub mod contact;
pub mod setting;
pub mod notification;
pub mod app_usage;

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Every `timestamp`/`last_used` column stores this representation.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
