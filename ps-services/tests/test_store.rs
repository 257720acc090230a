//! Persistence facade integration tests.
//!
//! Tests ordering, idempotence and upsert guarantees of `PhoneStore`, default
//! seeding across restarts, reset, and the event stream.

mod common;

use ps_core::config::DatabaseConfig;
use ps_models::NotificationKind;
use ps_services::event_bus::AppEvent;
use ps_services::store::PhoneStore;

// ---- Messages ----

#[tokio::test]
async fn messages_are_newest_first_and_unread() {
    let (store, _dir) = common::create_test_store();

    let first = store.add_message("You", "first").await.unwrap();
    let second = store.add_message("You", "second").await.unwrap();
    assert!(!first.is_read);
    assert!(!second.is_read);

    let messages = store.get_messages().await.unwrap();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0].id, second.id);
    assert_eq!(messages[1].id, first.id);
    for pair in messages.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

#[tokio::test]
async fn mark_message_read_is_idempotent() {
    let (store, _dir) = common::create_test_store();
    let msg = store.add_message("Bob Smith", "ping").await.unwrap();

    store.mark_message_as_read(msg.id).await.unwrap();
    store.mark_message_as_read(msg.id).await.unwrap();

    let messages = store.get_messages().await.unwrap();
    let read = messages.iter().find(|m| m.id == msg.id).unwrap();
    assert!(read.is_read);
    assert_eq!(messages.iter().filter(|m| m.is_read).count(), 1);
}

#[tokio::test]
async fn mark_unknown_message_changes_nothing() {
    let (store, _dir) = common::create_test_store();
    let before = store.get_messages().await.unwrap();

    store.mark_message_as_read(9_999).await.unwrap();

    assert_eq!(store.get_messages().await.unwrap(), before);
}

// ---- Contacts ----

#[tokio::test]
async fn contacts_sorted_by_name() {
    let (store, _dir) = common::create_test_store();
    store.add_contact("Aaron Abbott", "+1 555 0000", None).await.unwrap();
    store.add_contact("Zoe Zimmer", "+1 555 9999", Some("zz.png")).await.unwrap();

    let names: Vec<String> = store
        .get_contacts()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(
        names,
        vec!["Aaron Abbott", "Alice Johnson", "Bob Smith", "Carol Davis", "Zoe Zimmer"]
    );
}

// ---- Settings ----

#[tokio::test]
async fn settings_upsert_never_duplicates() {
    let (store, _dir) = common::create_test_store();

    for i in 0..10 {
        store.set_setting("userName", &format!("Player {i}")).await.unwrap();
    }

    assert_eq!(store.get_setting("userName").await.unwrap().as_deref(), Some("Player 9"));
    let all = store.get_all_settings().await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(store.stats().await.unwrap().settings, 4);
}

#[tokio::test]
async fn missing_setting_is_none() {
    let (store, _dir) = common::create_test_store();
    assert_eq!(store.get_setting("wallpaper").await.unwrap(), None);
}

// ---- Notifications ----

#[tokio::test]
async fn clear_all_notifications_empties_list() {
    let (store, _dir) = common::create_test_store();
    store
        .add_notification("Ping", "Hello", "Messages", NotificationKind::Message)
        .await
        .unwrap();

    let removed = store.clear_all_notifications().await.unwrap();
    assert_eq!(removed, 4);
    assert!(store.get_notifications().await.unwrap().is_empty());
    assert_eq!(store.get_unread_notifications_count().await.unwrap(), 0);
}

#[tokio::test]
async fn notification_read_and_delete() {
    let (store, _dir) = common::create_test_store();
    let n = store
        .add_notification("Weather", "Rain later", "Weather", NotificationKind::default())
        .await
        .unwrap();
    assert_eq!(n.kind, NotificationKind::System);
    assert_eq!(store.get_unread_notifications_count().await.unwrap(), 4);

    store.mark_notification_as_read(n.id).await.unwrap();
    store.mark_notification_as_read(n.id).await.unwrap();
    assert_eq!(store.get_unread_notifications_count().await.unwrap(), 3);

    assert!(store.delete_notification(n.id).await.unwrap());
    assert!(!store.delete_notification(n.id).await.unwrap());
    assert_eq!(store.get_notifications().await.unwrap().len(), 3);
}

#[tokio::test]
async fn unread_grouped_by_app_most_recent_first() {
    let (store, _dir) = common::create_test_store();
    store
        .add_notification("A", "one", "Messages", NotificationKind::Message)
        .await
        .unwrap();

    let groups = store.unread_notifications_by_app().await.unwrap();
    assert_eq!(groups[0].app_name, "Messages");
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups.iter().map(|g| g.count).sum::<i64>(), 4);
}

// ---- App usage ----

#[tokio::test]
async fn app_usage_upserts_by_name() {
    let (store, _dir) = common::create_test_store();
    store.update_app_usage("Calculator", 10).await.unwrap();
    store.update_app_usage("Calculator", 25).await.unwrap();
    store.update_app_usage("Notes", 5).await.unwrap();

    let usage = store.get_app_usage().await.unwrap();
    assert_eq!(usage.len(), 2);
    let calc = usage.iter().find(|u| u.app_name == "Calculator").unwrap();
    assert_eq!(calc.usage_time, 25);
}

// ---- Lifecycle ----

#[tokio::test]
async fn init_twice_seeds_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("phone.db");

    for _ in 0..2 {
        let store = PhoneStore::new(&path, DatabaseConfig::default(), common::create_test_event_bus());
        store.init().await.unwrap();
        store.init().await.unwrap();
        store.close().await;
    }

    let store = PhoneStore::new(&path, DatabaseConfig::default(), common::create_test_event_bus());
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.contacts, 3);
    assert_eq!(stats.messages, 3);
    assert_eq!(stats.settings, 4);
    assert_eq!(stats.notifications, 3);
    assert_eq!(stats.app_usage, 0);
}

#[tokio::test]
async fn cleared_notifications_are_reseeded_on_next_launch() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("phone.db");

    let store = PhoneStore::new(&path, DatabaseConfig::default(), common::create_test_event_bus());
    store.clear_all_notifications().await.unwrap();
    store.add_message("You", "kept").await.unwrap();
    store.close().await;

    let store = PhoneStore::new(&path, DatabaseConfig::default(), common::create_test_event_bus());
    assert_eq!(store.get_notifications().await.unwrap().len(), 3);
    assert_eq!(store.get_messages().await.unwrap().len(), 4);
}

#[tokio::test]
async fn reset_restores_sample_data() {
    let (store, _dir) = common::create_test_store();
    store.add_contact("Dan", "123", None).await.unwrap();
    store.set_setting("theme", "dark").await.unwrap();

    let report = store.reset().await.unwrap();
    assert_eq!(report.contacts, 3);
    assert_eq!(store.get_contacts().await.unwrap().len(), 3);
    assert_eq!(store.get_setting("theme").await.unwrap().as_deref(), Some("light"));
    store.integrity_check().await.unwrap();
}

#[tokio::test]
async fn unopenable_path_reports_store_unavailable() {
    let dir = tempfile::TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "not a dir").unwrap();
    let store = PhoneStore::new(
        blocker.join("phone.db"),
        DatabaseConfig::default(),
        common::create_test_event_bus(),
    );

    let err = store.get_messages().await.unwrap_err();
    assert!(err.is_store_unavailable());
    assert!(!store.is_initialized().await);
}

// ---- Events ----

#[tokio::test]
async fn mutations_are_announced() {
    let (store, _dir) = common::create_test_store();
    store.init().await.unwrap();
    let mut rx = store.event_bus().subscribe();

    let msg = store.add_message("You", "hi").await.unwrap();
    store.set_setting("sound", "false").await.unwrap();
    store.clear_all_notifications().await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        AppEvent::MessageAdded { id: msg.id, sender: "You".into() }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        AppEvent::SettingChanged { key: "sound".into(), value: "false".into() }
    );
    assert_eq!(rx.recv().await.unwrap(), AppEvent::NotificationsCleared { removed: 3 });
}
