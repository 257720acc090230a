//! Shared test utilities for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use ps_core::config::{AppConfig, ConfigHandle, DatabaseConfig, SimulationConfig, StatusBarConfig};
use ps_services::event_bus::EventBus;
use ps_services::notes::NoteStore;
use ps_services::store::PhoneStore;
use tempfile::TempDir;

/// Create a store over a fresh database file.
/// Returns the store and the TempDir (must be held alive for the duration of the test).
pub fn create_test_store() -> (Arc<PhoneStore>, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = PhoneStore::new(
        dir.path().join("test.db"),
        DatabaseConfig::default(),
        create_test_event_bus(),
    );
    (Arc::new(store), dir)
}

/// Create a file-backed note store in its own temp dir.
pub fn create_test_notes() -> (Arc<NoteStore>, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let notes = NoteStore::file_backed(dir.path().join("blobs"), create_test_event_bus());
    (Arc::new(notes), dir)
}

/// Create a default test configuration.
pub fn create_test_config() -> AppConfig {
    AppConfig::default()
}

/// Create a ConfigHandle wrapping a default config.
pub fn create_test_config_handle() -> ConfigHandle {
    ConfigHandle::new(create_test_config())
}

/// Create an EventBus with a small buffer suitable for tests.
pub fn create_test_event_bus() -> EventBus {
    EventBus::new(64)
}

/// Simulation settings with a short reply delay.
pub fn fast_simulation() -> SimulationConfig {
    SimulationConfig {
        auto_reply: true,
        auto_reply_delay_ms: 20,
        auto_reply_sender: "Alice Johnson".to_string(),
    }
}

/// Simulation settings with the simulated correspondent switched off.
pub fn quiet_simulation() -> SimulationConfig {
    SimulationConfig {
        auto_reply: false,
        ..SimulationConfig::default()
    }
}

/// Status bar settings with long intervals so only explicit calls change state.
pub fn slow_status_bar() -> StatusBarConfig {
    StatusBarConfig {
        notification_poll_secs: 3_600,
        clock_tick_secs: 3_600,
        telemetry_tick_secs: 3_600,
        ..StatusBarConfig::default()
    }
}
