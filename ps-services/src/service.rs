//! Service trait and lifecycle management.
//!
//! Long-lived components (the persistence facade, the notes store, the status
//! indicator) implement `Service` so the registry can bring them up in order
//! and tear them down in reverse.

use async_trait::async_trait;
use tokio::sync::watch;

use ps_core::error::PsResult;

/// Lifecycle state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Service has been created but not initialized.
    Created,
    /// Service is initializing.
    Initializing,
    /// Service is running and ready.
    Running,
    /// Service is shutting down.
    ShuttingDown,
    /// Service has been stopped.
    Stopped,
    /// Initialization failed; the next `init` retries.
    Failed,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Initializing => write!(f, "initializing"),
            Self::Running => write!(f, "running"),
            Self::ShuttingDown => write!(f, "shutting_down"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Trait that all simulator services implement.
///
/// Methods take `&self` so a service can be shared behind an `Arc` between
/// the registry and the screens that use it.
#[async_trait]
pub trait Service: Send + Sync {
    /// Human-readable name of this service.
    fn name(&self) -> &str;

    /// Current state of this service.
    fn state(&self) -> ServiceState;

    /// Initialize the service. Safe to call more than once.
    async fn init(&self) -> PsResult<()>;

    /// Gracefully shut down the service.
    async fn shutdown(&self) -> PsResult<()>;

    /// Health check. Returns true if the service is operational.
    fn is_healthy(&self) -> bool {
        self.state() == ServiceState::Running
    }
}

/// Shared lifecycle cell backed by a watch channel.
///
/// Reading the state never blocks and never fails, and observers can
/// subscribe to transitions.
#[derive(Debug)]
pub struct StateCell {
    tx: watch::Sender<ServiceState>,
}

impl StateCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ServiceState::Created);
        Self { tx }
    }

    pub fn get(&self) -> ServiceState {
        *self.tx.borrow()
    }

    pub fn set(&self, state: ServiceState) {
        self.tx.send_replace(state);
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.tx.subscribe()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
