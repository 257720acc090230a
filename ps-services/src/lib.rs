//! Phone Simulator Services - persistence facade, background jobs and screens.
//!
//! This crate provides:
//! - `PhoneStore`, the lazily-initialized async facade over the SQLite store
//! - the notes blob store (file-backed or in-memory)
//! - the status indicator with notification polling and simulated telemetry
//! - screen view-models for the home screen and each built-in app
//! - the calculator state machine
//! - the event bus, service trait and service registry

pub mod service;
pub mod registry;
pub mod event_bus;
pub mod store;
pub mod notes;
pub mod routes;
pub mod format;
pub mod telemetry;
pub mod scheduler;
pub mod status;
pub mod screens;

// Re-export key types
pub use service::{Service, ServiceState};
pub use registry::ServiceRegistry;
pub use event_bus::{AppEvent, EventBus};
pub use store::PhoneStore;
pub use notes::{BlobStore, FileBlobStore, MemoryBlobStore, Note, NoteStore};
pub use routes::Route;
pub use status::{AppBadge, StatusIndicator, StatusSnapshot};
pub use telemetry::DeviceTelemetry;
pub use screens::calculator::Calculator;
pub use screens::{Alert, ScreenResult};
