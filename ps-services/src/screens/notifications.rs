//! Notifications screen.

use std::sync::Arc;

use tracing::debug;

use ps_models::{Notification, NotificationKind};

use super::{Alert, ScreenResult, ViewGuard};
use crate::format;
use crate::routes::Route;
use crate::store::PhoneStore;

/// What pressing a notification leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    Navigate(Route),
    Show(Alert),
}

/// Icon name for a notification category.
pub fn kind_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Message => "comment",
        NotificationKind::System => "cog",
        NotificationKind::App => "mobile",
    }
}

/// Notifications screen state.
pub struct NotificationsScreen {
    store: Arc<PhoneStore>,
    guard: ViewGuard,
    notifications: Vec<Notification>,
}

impl NotificationsScreen {
    pub fn new(store: Arc<PhoneStore>) -> Self {
        Self {
            store,
            guard: ViewGuard::new(),
            notifications: Vec::new(),
        }
    }

    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    pub async fn load(&mut self) -> ScreenResult<()> {
        let list = self
            .store
            .get_notifications()
            .await
            .map_err(|e| Alert::from_error("Failed to load notifications", &e))?;
        if self.guard.is_mounted() {
            self.notifications = list;
        } else {
            debug!("notifications unmounted, dropping load result");
        }
        Ok(())
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// `3 unread notifications`, or nothing when all are read.
    pub fn unread_label(&self) -> Option<String> {
        match self.unread_count() {
            0 => None,
            1 => Some("1 unread notification".to_string()),
            n => Some(format!("{n} unread notifications")),
        }
    }

    /// Relative age label for a notification at `now` (epoch ms).
    pub fn time_label(notification: &Notification, now: i64) -> String {
        format::relative_time(notification.timestamp, now)
    }

    /// Press a notification: mark it read, then route by app name or show it.
    pub async fn press(&mut self, id: i64) -> ScreenResult<PressOutcome> {
        let notification = self
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Alert::new("Error", "Notification not found"))?;

        if !notification.is_read {
            self.mark_read(id).await?;
        }

        Ok(match Route::for_notification(&notification.app_name) {
            Some(route) => PressOutcome::Navigate(route),
            None => PressOutcome::Show(Alert::new(notification.title, notification.body)),
        })
    }

    pub async fn mark_read(&mut self, id: i64) -> ScreenResult<()> {
        self.store
            .mark_notification_as_read(id)
            .await
            .map_err(|e| Alert::from_error("Failed to mark notification as read", &e))?;
        if let Some(n) = self.notifications.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        self.load().await
    }

    pub async fn delete(&mut self, id: i64) -> ScreenResult<bool> {
        let removed = self
            .store
            .delete_notification(id)
            .await
            .map_err(|e| Alert::from_error("Failed to delete notification", &e))?;
        self.notifications.retain(|n| n.id != id);
        self.load().await?;
        Ok(removed)
    }

    /// Confirmation shown before clearing.
    pub fn clear_all_prompt() -> Alert {
        Alert::new(
            "Clear All Notifications",
            "Are you sure you want to clear all notifications?",
        )
    }

    pub async fn clear_all(&mut self) -> ScreenResult<usize> {
        let removed = self
            .store
            .clear_all_notifications()
            .await
            .map_err(|e| Alert::from_error("Failed to clear notifications", &e))?;
        self.notifications.clear();
        self.load().await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_icons() {
        assert_eq!(kind_icon(NotificationKind::Message), "comment");
        assert_eq!(kind_icon(NotificationKind::default()), "cog");
    }

    #[test]
    fn test_clear_prompt() {
        let prompt = NotificationsScreen::clear_all_prompt();
        assert_eq!(prompt.title, "Clear All Notifications");
    }
}
