//! Screen view-models.
//!
//! Each screen owns its transient view state, reads and writes durable state
//! through the [`PhoneStore`](crate::store::PhoneStore) (or the note store),
//! and reports failures as an [`Alert`] while leaving its previous state
//! untouched.

pub mod home;
pub mod messages;
pub mod contacts;
pub mod notes;
pub mod calculator;
pub mod settings;
pub mod notifications;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use ps_core::error::PsError;

/// A non-blocking message box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Alert for input rejected before reaching the store.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    /// Alert for a failed store call.
    ///
    /// Validation errors show their own message; anything else shows
    /// `fallback` and is logged.
    pub fn from_error(fallback: &str, err: &PsError) -> Self {
        if err.is_validation() {
            Self::new("Error", err.to_string())
        } else {
            error!("{fallback}: {err}");
            Self::new("Error", fallback)
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Result type for screen actions.
pub type ScreenResult<T> = Result<T, Alert>;

/// Tracks whether a screen is still mounted.
///
/// Clones share one flag, so a front-end can keep a clone and unmount the
/// screen while one of its loads is still awaiting the store.
#[derive(Debug, Clone)]
pub struct ViewGuard {
    mounted: Arc<AtomicBool>,
}

impl ViewGuard {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn remount(&self) {
        self.mounted.store(true, Ordering::SeqCst);
    }
}

impl Default for ViewGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_from_validation_keeps_message() {
        let alert = Alert::from_error("Failed to add contact", &PsError::validation("Please fill in all fields"));
        assert_eq!(alert, Alert::new("Error", "Please fill in all fields"));
    }

    #[test]
    fn test_alert_from_query_error_uses_fallback() {
        let alert = Alert::from_error("Failed to add contact", &PsError::Query("disk I/O".into()));
        assert_eq!(alert.message, "Failed to add contact");
    }

    #[test]
    fn test_view_guard_shared() {
        let guard = ViewGuard::new();
        let clone = guard.clone();
        clone.unmount();
        assert!(!guard.is_mounted());
        guard.remount();
        assert!(clone.is_mounted());
    }
}
