//! Typed event bus for store change notifications.
//!
//! Uses a tokio broadcast channel so the facade can announce mutations
//! without knowing which screens or indicators are listening.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use ps_models::NotificationKind;

/// Application-level events emitted after a successful store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The store was opened and default data seeded.
    StoreInitialized {
        seeded_rows: usize,
    },
    /// A message was inserted.
    MessageAdded {
        id: i64,
        sender: String,
    },
    /// A message was marked read.
    MessageRead {
        id: i64,
    },
    /// A contact was inserted.
    ContactAdded {
        id: i64,
        name: String,
    },
    /// A setting was written.
    SettingChanged {
        key: String,
        value: String,
    },
    /// A notification was inserted.
    NotificationAdded {
        id: i64,
        app_name: String,
        kind: NotificationKind,
    },
    /// A notification was marked read.
    NotificationRead {
        id: i64,
    },
    /// A single notification was deleted.
    NotificationDeleted {
        id: i64,
    },
    /// Every notification was deleted.
    NotificationsCleared {
        removed: usize,
    },
    /// An app usage row was upserted.
    AppUsageUpdated {
        app_name: String,
    },
    /// The notes blob was rewritten.
    NotesChanged {
        count: usize,
    },
    /// All tables were dropped, recreated and re-seeded.
    StoreReset,
}

/// Application-wide event bus backed by a tokio broadcast channel.
///
/// Every subscriber gets every event. Slow subscribers that fall behind
/// receive a `Lagged` error and may miss events.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<AppEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to receive application events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: AppEvent) {
        let label = event_label(&event);
        match self.sender.send(event) {
            Ok(count) => {
                debug!("event_bus: emitted {label} to {count} subscriber(s)");
            }
            Err(_) => {
                debug!("event_bus: no subscribers for {label}");
            }
        }
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Human-readable label for an event (for logging).
pub fn event_label(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::StoreInitialized { .. } => "StoreInitialized",
        AppEvent::MessageAdded { .. } => "MessageAdded",
        AppEvent::MessageRead { .. } => "MessageRead",
        AppEvent::ContactAdded { .. } => "ContactAdded",
        AppEvent::SettingChanged { .. } => "SettingChanged",
        AppEvent::NotificationAdded { .. } => "NotificationAdded",
        AppEvent::NotificationRead { .. } => "NotificationRead",
        AppEvent::NotificationDeleted { .. } => "NotificationDeleted",
        AppEvent::NotificationsCleared { .. } => "NotificationsCleared",
        AppEvent::AppUsageUpdated { .. } => "AppUsageUpdated",
        AppEvent::NotesChanged { .. } => "NotesChanged",
        AppEvent::StoreReset => "StoreReset",
    }
}

impl AppEvent {
    /// Whether this event can change the unread-notification badges.
    pub fn affects_notifications(&self) -> bool {
        matches!(
            self,
            AppEvent::NotificationAdded { .. }
                | AppEvent::NotificationRead { .. }
                | AppEvent::NotificationDeleted { .. }
                | AppEvent::NotificationsCleared { .. }
                | AppEvent::StoreReset
                | AppEvent::StoreInitialized { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_emit_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(AppEvent::ContactAdded {
            id: 7,
            name: "Dana".into(),
        });

        match rx.recv().await.unwrap() {
            AppEvent::ContactAdded { id, name } => {
                assert_eq!(id, 7);
                assert_eq!(name, "Dana");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(AppEvent::StoreReset);

        assert_eq!(rx1.recv().await.unwrap(), AppEvent::StoreReset);
        assert_eq!(rx2.recv().await.unwrap(), AppEvent::StoreReset);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(4);
        bus.emit(AppEvent::MessageRead { id: 1 });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_affects_notifications() {
        assert!(AppEvent::NotificationsCleared { removed: 2 }.affects_notifications());
        assert!(!AppEvent::MessageRead { id: 1 }.affects_notifications());
        assert_eq!(event_label(&AppEvent::NotesChanged { count: 0 }), "NotesChanged");
    }
}
