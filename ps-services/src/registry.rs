//! Service registry for wiring and lifecycle management.
//!
//! The registry owns the shared infrastructure (config, event bus, the
//! persistence facade and the note store), initializes registered services in
//! order and shuts them down in reverse.

use std::sync::Arc;

use tracing::{error, info};

use ps_core::config::ConfigHandle;
use ps_core::error::{PsError, PsResult};

use crate::event_bus::EventBus;
use crate::notes::NoteStore;
use crate::service::{Service, ServiceState};
use crate::status::StatusIndicator;
use crate::store::PhoneStore;

/// Central registry for the simulator's long-lived services.
pub struct ServiceRegistry {
    /// Application configuration.
    pub config: ConfigHandle,
    /// Application-level event bus.
    pub event_bus: EventBus,
    /// Persistence facade.
    pub store: Arc<PhoneStore>,
    /// Notes blob store.
    pub notes: Arc<NoteStore>,
    services: Vec<(String, Arc<dyn Service>)>,
}

impl ServiceRegistry {
    /// Create a registry around an existing store and note store.
    pub fn new(config: ConfigHandle, store: Arc<PhoneStore>, notes: Arc<NoteStore>) -> Self {
        Self {
            config,
            event_bus: store.event_bus().clone(),
            store,
            notes,
            services: Vec::new(),
        }
    }

    /// Build the store and the file-backed note store from configuration.
    pub async fn from_config(config: ConfigHandle) -> PsResult<Self> {
        let cfg = config.snapshot().await;
        let bus = EventBus::default();
        let store = PhoneStore::new(cfg.effective_db_path()?, cfg.database.clone(), bus.clone());
        let notes = NoteStore::file_backed(cfg.effective_notes_dir()?, bus);
        Ok(Self::new(config, Arc::new(store), Arc::new(notes)))
    }

    /// Register a service. Services are initialized in registration order.
    pub fn register(&mut self, service: Arc<dyn Service>) {
        let name = service.name().to_string();
        info!("registered service: {name}");
        self.services.push((name, service));
    }

    /// Register the store and the note store.
    ///
    /// The status indicator is registered separately by front-ends that draw
    /// a status bar, see [`register_status_indicator`](Self::register_status_indicator).
    pub fn register_all(&mut self) {
        self.register(self.store.clone());
        self.register(self.notes.clone());
        info!("registered {} default services", self.services.len());
    }

    /// Register a status indicator bound to this registry's store.
    pub async fn register_status_indicator(&mut self) -> Arc<StatusIndicator> {
        let status_cfg = self.config.read().await.status_bar.clone();
        let indicator = Arc::new(StatusIndicator::new(self.store.clone(), status_cfg));
        self.register(indicator.clone());
        indicator
    }

    /// Initialize all registered services in order.
    pub async fn init_all(&self) -> PsResult<()> {
        info!("initializing {} services", self.services.len());

        for (name, service) in &self.services {
            info!("initializing service: {name}");
            if let Err(e) = service.init().await {
                error!("failed to initialize service {name}: {e}");
                return Err(PsError::ServiceInit(format!("{name}: {e}")));
            }
        }

        info!("all services initialized");
        Ok(())
    }

    /// Shut down all services in reverse order.
    pub async fn shutdown_all(&self) -> PsResult<()> {
        info!("shutting down services");

        for (name, service) in self.services.iter().rev() {
            info!("shutting down service: {name}");
            if let Err(e) = service.shutdown().await {
                error!("error shutting down service {name}: {e}");
            }
        }

        info!("all services shut down");
        Ok(())
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Name, state and health of every service.
    pub fn health_check(&self) -> Vec<(String, ServiceState, bool)> {
        self.services
            .iter()
            .map(|(name, svc)| (name.clone(), svc.state(), svc.is_healthy()))
            .collect()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ps_core::config::{AppConfig, DatabaseConfig};
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn registry(dir: &TempDir) -> ServiceRegistry {
        let bus = EventBus::new(64);
        let store = PhoneStore::new(dir.path().join("test.db"), DatabaseConfig::default(), bus.clone());
        let notes = NoteStore::in_memory(bus);
        ServiceRegistry::new(
            ConfigHandle::new(AppConfig::default()),
            Arc::new(store),
            Arc::new(notes),
        )
    }

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail_init: bool,
        fail_shutdown: bool,
    }

    #[async_trait]
    impl Service for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn state(&self) -> ServiceState {
            ServiceState::Running
        }

        async fn init(&self) -> PsResult<()> {
            self.log.lock().unwrap().push(format!("init {}", self.name));
            if self.fail_init {
                return Err(PsError::Internal("boom".into()));
            }
            Ok(())
        }

        async fn shutdown(&self) -> PsResult<()> {
            self.log.lock().unwrap().push(format!("shutdown {}", self.name));
            if self.fail_shutdown {
                return Err(PsError::Internal("stuck".into()));
            }
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
            fail_init: false,
            fail_shutdown: false,
        }
    }

    #[tokio::test]
    async fn test_register_all() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry(&dir);
        registry.register_all();
        assert_eq!(registry.service_count(), 2);
    }

    #[tokio::test]
    async fn test_init_and_shutdown() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry(&dir);
        registry.register_all();
        let status = registry.register_status_indicator().await;

        registry.init_all().await.unwrap();
        for (name, state, healthy) in registry.health_check() {
            assert!(healthy, "service {name} is not healthy (state: {state})");
        }
        assert_eq!(status.active_jobs().await, 4);

        registry.shutdown_all().await.unwrap();
        assert!(status.is_disposed());
        assert!(!registry.store.is_initialized().await);
        for (_, state, _) in registry.health_check() {
            assert_eq!(state, ServiceState::Stopped);
        }
    }

    #[tokio::test]
    async fn test_init_order_and_reverse_shutdown() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry(&dir);
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(Arc::new(recorder("a", &log)));
        registry.register(Arc::new(Recorder {
            fail_shutdown: true,
            ..recorder("b", &log)
        }));
        registry.register(Arc::new(recorder("c", &log)));

        registry.init_all().await.unwrap();
        registry.shutdown_all().await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["init a", "init b", "init c", "shutdown c", "shutdown b", "shutdown a"]
        );
    }

    #[tokio::test]
    async fn test_init_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry(&dir);
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(Arc::new(Recorder {
            fail_init: true,
            ..recorder("a", &log)
        }));
        registry.register(Arc::new(recorder("b", &log)));

        let err = registry.init_all().await.unwrap_err();
        assert!(matches!(err, PsError::ServiceInit(ref msg) if msg.starts_with("a:")));
        assert_eq!(*log.lock().unwrap(), vec!["init a"]);
    }
}
