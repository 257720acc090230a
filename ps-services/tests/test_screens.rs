//! Screen view-model integration tests.
//!
//! Drives each screen against a real store (or note store) the way a
//! front-end would: load, act, reload, and inspect alerts on failure.

mod common;

use std::time::Duration;

use ps_models::NotificationKind;
use ps_services::routes::Route;
use ps_services::screens::contacts::ContactsScreen;
use ps_services::screens::home::{HomeScreen, Launch};
use ps_services::screens::messages::{MessagesScreen, CANNED_REPLIES, MAX_MESSAGE_CHARS};
use ps_services::screens::notes::NotesScreen;
use ps_services::screens::notifications::{NotificationsScreen, PressOutcome};
use ps_services::screens::settings::{ActionOutcome, SettingAction, SettingKind, SettingsScreen};
use ps_services::screens::Alert;

// ---- Home ----

#[tokio::test]
async fn home_reads_user_name() {
    let (store, _dir) = common::create_test_store();
    store.set_setting("userName", "Sam").await.unwrap();

    let mut home = HomeScreen::new(store);
    assert_eq!(home.user_name(), "Player");
    home.load().await;
    assert_eq!(home.user_name(), "Sam");

    assert_eq!(home.launch("notes").unwrap(), Launch::Open(Route::Notes));
    match home.launch("Weather").unwrap() {
        Launch::Alert(alert) => assert_eq!(alert.message, "Weather app coming soon!"),
        other => panic!("expected alert, got {other:?}"),
    }
    assert!(home.launch("Fax").is_err());
}

#[tokio::test]
async fn home_load_after_unmount_keeps_default() {
    let (store, _dir) = common::create_test_store();
    store.set_setting("userName", "Sam").await.unwrap();

    let mut home = HomeScreen::new(store);
    home.guard().unmount();
    home.load().await;
    assert_eq!(home.user_name(), "Player");
}

// ---- Messages ----

#[tokio::test]
async fn send_rejects_blank_and_oversized_text() {
    let (store, _dir) = common::create_test_store();
    let mut screen = MessagesScreen::new(store.clone(), common::quiet_simulation());
    screen.load().await.unwrap();

    assert_eq!(screen.send("   ").await.unwrap_err(), Alert::invalid("Please enter a message"));
    let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
    assert!(screen.send(&long).await.is_err());
    assert_eq!(store.get_messages().await.unwrap().len(), 3);
}

#[tokio::test]
async fn send_stores_trimmed_message_as_user() {
    let (store, _dir) = common::create_test_store();
    let mut screen = MessagesScreen::new(store, common::quiet_simulation());
    screen.load().await.unwrap();
    screen.toggle_compose();
    screen.set_draft("  hello there  ");

    let sent = screen.send_draft().await.unwrap();
    assert_eq!(sent.sender, "You");
    assert_eq!(sent.content, "hello there");
    assert_eq!(screen.messages()[0].id, sent.id);
    assert!(!screen.is_composing());
    assert!(screen.draft().is_empty());
    assert_eq!(screen.pending_replies(), 0);
}

#[tokio::test]
async fn failed_send_keeps_draft() {
    let (store, _dir) = common::create_test_store();
    let mut screen = MessagesScreen::new(store, common::quiet_simulation());
    screen.set_draft("   ");
    assert!(screen.send_draft().await.is_err());
    assert_eq!(screen.draft(), "   ");
}

#[tokio::test]
async fn open_marks_message_read() {
    let (store, _dir) = common::create_test_store();
    let mut screen = MessagesScreen::new(store, common::quiet_simulation());
    screen.load().await.unwrap();
    assert_eq!(screen.unread_count(), 3);

    let target = screen.messages()[0].clone();
    let alert = screen.open(target.id).await.unwrap();
    assert_eq!(alert, Alert::new(target.sender, target.content));
    assert_eq!(screen.unread_count(), 2);

    screen.open(target.id).await.unwrap();
    assert_eq!(screen.unread_count(), 2);
}

#[tokio::test]
async fn simulated_reply_arrives_with_notification() {
    let (store, _dir) = common::create_test_store();
    let mut screen = MessagesScreen::new(store.clone(), common::fast_simulation());
    screen.load().await.unwrap();

    screen.send("Are you free?").await.unwrap();
    assert_eq!(screen.pending_replies(), 1);
    screen.wait_for_replies().await.unwrap();

    let newest = &screen.messages()[0];
    assert_eq!(newest.sender, "Alice Johnson");
    assert!(CANNED_REPLIES.contains(&newest.content.as_str()));
    assert_eq!(screen.messages().len(), 5);

    let notification = &store.get_notifications().await.unwrap()[0];
    assert_eq!(notification.title, "New Message");
    assert_eq!(notification.app_name, "Messages");
    assert_eq!(notification.kind, NotificationKind::Message);
    assert_eq!(notification.body, format!("Alice Johnson: {}", newest.content));
}

#[tokio::test]
async fn dropping_screen_cancels_reply() {
    let (store, _dir) = common::create_test_store();
    let mut simulation = common::fast_simulation();
    simulation.auto_reply_delay_ms = 200;
    let mut screen = MessagesScreen::new(store.clone(), simulation);

    screen.send("anyone?").await.unwrap();
    drop(screen);
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(store.get_messages().await.unwrap().len(), 4);
}

// ---- Contacts ----

#[tokio::test]
async fn add_contact_requires_both_fields() {
    let (store, _dir) = common::create_test_store();
    let mut screen = ContactsScreen::new(store.clone());

    let err = screen.add("Dana", "  ").await.unwrap_err();
    assert_eq!(err.message, "Please fill in all fields");
    assert_eq!(store.get_contacts().await.unwrap().len(), 3);
}

#[tokio::test]
async fn add_contact_posts_notification() {
    let (store, _dir) = common::create_test_store();
    let mut screen = ContactsScreen::new(store.clone());
    screen.load().await.unwrap();

    let added = screen.add(" Bea Brown ", "+1 555 2222").await.unwrap();
    assert_eq!(added.name, "Bea Brown");
    let names: Vec<&str> = screen.contacts().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alice Johnson", "Bea Brown", "Bob Smith", "Carol Davis"]);

    let latest = &store.get_notifications().await.unwrap()[0];
    assert_eq!(latest.title, "Contact Added");
    assert_eq!(latest.body, "Bea Brown has been added to your contacts");
    assert_eq!(latest.app_name, "Contacts");
    assert_eq!(latest.kind, NotificationKind::App);

    assert_eq!(
        screen.call(added.id).unwrap().message,
        "Calling Bea Brown..."
    );
}

#[tokio::test]
async fn contact_search_matches_name_or_phone() {
    let (store, _dir) = common::create_test_store();
    let mut screen = ContactsScreen::new(store);
    screen.load().await.unwrap();

    screen.set_query("ALICE");
    assert_eq!(screen.filtered().len(), 1);
    screen.set_query("987");
    assert_eq!(screen.filtered()[0].name, "Bob Smith");
    screen.set_query("   ");
    assert_eq!(screen.filtered().len(), 3);
}

// ---- Notes ----

#[tokio::test]
async fn note_lifecycle_persists_through_blob_store() {
    let (notes, _dir) = common::create_test_notes();
    let mut screen = NotesScreen::new(notes.clone());
    screen.load().await.unwrap();
    assert!(screen.notes().is_empty());

    let draft_id = screen.create().id.clone();
    assert!(screen.is_editing());
    assert_eq!(screen.title(), "New Note");
    screen.set_title("   ");
    screen.set_content("buy milk");
    let saved = screen.save().await.unwrap();
    assert_eq!(saved.id, draft_id);
    assert_eq!(saved.title, "Untitled");
    assert!(!screen.is_editing());

    screen.create();
    screen.set_title("Second");
    screen.save().await.unwrap();
    assert_eq!(screen.notes()[0].title, "Second");

    screen.select(&draft_id).unwrap();
    screen.edit();
    screen.set_title("Groceries");
    screen.save().await.unwrap();
    let stored = notes.load().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].id, draft_id);
    assert_eq!(stored[1].title, "Groceries");
    assert_eq!(stored[1].content, "buy milk");

    screen.delete_selected().await.unwrap();
    assert!(screen.selected().is_none());
    let stored = notes.load().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Second");
}

#[tokio::test]
async fn save_without_selection_is_rejected() {
    let (notes, _dir) = common::create_test_notes();
    let mut screen = NotesScreen::new(notes);
    assert!(screen.save().await.is_err());
    assert!(screen.select("missing").is_err());
    assert_eq!(NotesScreen::delete_prompt().title, "Delete Note");
}

// ---- Settings ----

#[tokio::test]
async fn settings_rows_reflect_store() {
    let (store, _dir) = common::create_test_store();
    let mut screen = SettingsScreen::new(store);
    screen.load().await.unwrap();

    assert_eq!(screen.items().len(), 7);
    assert_eq!(screen.user_name(), "Player");
    assert_eq!(screen.item("theme").unwrap().kind, SettingKind::Toggle(false));
    assert_eq!(screen.item("sound").unwrap().kind, SettingKind::Toggle(true));
    assert_eq!(
        screen.item("reset").unwrap().kind,
        SettingKind::Action(SettingAction::ResetAll)
    );
}

#[tokio::test]
async fn dark_mode_toggle_writes_theme() {
    let (store, _dir) = common::create_test_store();
    let mut screen = SettingsScreen::new(store.clone());
    screen.load().await.unwrap();

    let hint = screen.set_toggle("theme", true).await.unwrap();
    assert_eq!(hint.unwrap().title, "Theme Changed");
    assert_eq!(store.get_setting("theme").await.unwrap().as_deref(), Some("dark"));
    assert_eq!(screen.item("theme").unwrap().kind, SettingKind::Toggle(true));

    assert!(screen.set_toggle("sound", false).await.unwrap().is_none());
    assert_eq!(store.get_setting("sound").await.unwrap().as_deref(), Some("false"));

    assert!(screen.set_toggle("userName", true).await.is_err());
}

#[tokio::test]
async fn user_name_must_not_be_blank() {
    let (store, _dir) = common::create_test_store();
    let mut screen = SettingsScreen::new(store.clone());
    screen.load().await.unwrap();

    assert!(screen.save_user_name("  ").await.is_err());
    assert!(screen.save_user_name(&"x".repeat(51)).await.is_err());
    assert_eq!(screen.user_name(), "Player");

    let longest = "é".repeat(50);
    screen.save_user_name(&longest).await.unwrap();
    assert_eq!(screen.user_name(), longest);

    screen.save_user_name(" Robin ").await.unwrap();
    assert_eq!(screen.user_name(), "Robin");
    assert_eq!(
        screen.activate(SettingAction::EditUserName),
        ActionOutcome::PromptUserName("Robin".into())
    );
}

#[tokio::test]
async fn reset_writes_defaults_back() {
    let (store, _dir) = common::create_test_store();
    let mut screen = SettingsScreen::new(store.clone());
    screen.load().await.unwrap();
    screen.set_toggle("theme", true).await.unwrap();
    screen.save_user_name("Robin").await.unwrap();

    assert!(matches!(
        screen.activate(SettingAction::ResetAll),
        ActionOutcome::Confirm(_)
    ));
    let done = screen.reset_all().await.unwrap();
    assert_eq!(done, Alert::new("Success", "All data has been reset to defaults."));

    let all = store.get_all_settings().await.unwrap();
    assert_eq!(all["theme"], "light");
    assert_eq!(all["userName"], "Player");
    assert_eq!(all["notifications"], "true");
    assert_eq!(all["sound"], "true");
}

// ---- Notifications ----

#[tokio::test]
async fn pressing_notifications_routes_or_shows() {
    let (store, _dir) = common::create_test_store();
    let mut screen = NotificationsScreen::new(store.clone());
    screen.load().await.unwrap();
    assert_eq!(screen.unread_label().as_deref(), Some("3 unread notifications"));

    let by_app = |app: &str| {
        screen
            .notifications()
            .iter()
            .find(|n| n.app_name == app)
            .map(|n| n.id)
            .unwrap()
    };
    let (messages_id, system_id) = (by_app("Messages"), by_app("System"));

    assert_eq!(
        screen.press(messages_id).await.unwrap(),
        PressOutcome::Navigate(Route::Messages)
    );
    match screen.press(system_id).await.unwrap() {
        PressOutcome::Show(alert) => assert_eq!(alert.title, "System Update"),
        other => panic!("expected details, got {other:?}"),
    }
    assert_eq!(screen.unread_label().as_deref(), Some("1 unread notification"));
    assert_eq!(store.get_unread_notifications_count().await.unwrap(), 1);
}

#[tokio::test]
async fn clear_all_leaves_nothing_unread() {
    let (store, _dir) = common::create_test_store();
    let mut screen = NotificationsScreen::new(store);
    screen.load().await.unwrap();

    assert_eq!(screen.clear_all().await.unwrap(), 3);
    assert!(screen.notifications().is_empty());
    assert_eq!(screen.unread_label(), None);
}

#[tokio::test]
async fn delete_removes_one_notification() {
    let (store, _dir) = common::create_test_store();
    let mut screen = NotificationsScreen::new(store);
    screen.load().await.unwrap();
    let id = screen.notifications()[0].id;

    assert!(screen.delete(id).await.unwrap());
    assert_eq!(screen.notifications().len(), 2);
    assert!(!screen.delete(id).await.unwrap());
}

#[tokio::test]
async fn time_labels_are_relative() {
    let (store, _dir) = common::create_test_store();
    let mut screen = NotificationsScreen::new(store);
    screen.load().await.unwrap();

    let newest = &screen.notifications()[0];
    let label = NotificationsScreen::time_label(newest, newest.timestamp + 5 * 60_000);
    assert_eq!(label, "5m ago");
    assert_eq!(NotificationsScreen::time_label(newest, newest.timestamp), "now");
}
