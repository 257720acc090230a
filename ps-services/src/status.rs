//! Status bar indicator.
//!
//! Shows the clock, a badge per app with unread notifications, the total
//! unread count and simulated battery/signal/WiFi telemetry. Three periodic
//! jobs keep it current; a fourth listens on the event bus so badges update
//! as soon as a notification is added or read.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use ps_core::config::StatusBarConfig;
use ps_core::error::PsResult;
use ps_models::AppUnreadCount;

use crate::format;
use crate::routes::Route;
use crate::scheduler::ScheduledTask;
use crate::service::{Service, ServiceState, StateCell};
use crate::store::PhoneStore;
use crate::telemetry::DeviceTelemetry;

/// Unread notifications of one app, as drawn next to the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppBadge {
    pub app_name: String,
    pub count: i64,
    pub icon: &'static str,
    pub route: Route,
}

impl AppBadge {
    pub fn from_group(group: &AppUnreadCount) -> Self {
        let icon = match group.app_name.to_lowercase().as_str() {
            "messages" => "comment",
            "contacts" => "user",
            "system" => "cog",
            _ => "bell",
        };
        Self {
            app_name: group.app_name.clone(),
            count: group.count,
            icon,
            route: Route::for_badge(&group.app_name),
        }
    }

    /// Counter drawn on the badge: nothing for a single item, `9+` past nine.
    pub fn count_label(&self) -> Option<String> {
        match self.count {
            c if c <= 1 => None,
            c if c > 9 => Some("9+".to_string()),
            c => Some(c.to_string()),
        }
    }
}

/// Everything the status bar renders.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub now: DateTime<Local>,
    pub unread_total: i64,
    /// Every app with unread notifications, most recent first.
    pub badges: Vec<AppBadge>,
    pub telemetry: DeviceTelemetry,
}

impl StatusSnapshot {
    fn new(initial_battery: f64) -> Self {
        Self {
            now: Local::now(),
            unread_total: 0,
            badges: Vec::new(),
            telemetry: DeviceTelemetry::new(initial_battery),
        }
    }

    pub fn clock_label(&self, use_24hr: bool) -> String {
        format::clock_label(&self.now, use_24hr)
    }
}

struct Inner {
    store: Arc<PhoneStore>,
    config: StatusBarConfig,
    snapshot: RwLock<StatusSnapshot>,
    rng: Mutex<StdRng>,
    disposed: AtomicBool,
    /// Bumped on every mount so results from an earlier mount are dropped.
    epoch: AtomicU64,
}

impl Inner {
    fn is_live(&self, epoch: u64) -> bool {
        !self.disposed.load(Ordering::SeqCst) && self.epoch.load(Ordering::SeqCst) == epoch
    }

    async fn refresh_notifications(&self, epoch: u64) -> PsResult<bool> {
        let unread = self.store.get_unread_notifications_count().await?;
        let groups = self.store.unread_notifications_by_app().await?;

        if !self.is_live(epoch) {
            debug!("status bar disposed, discarding notification refresh");
            return Ok(false);
        }

        let mut snap = self.snapshot.write().await;
        snap.unread_total = unread;
        snap.badges = groups.iter().map(AppBadge::from_group).collect();
        Ok(true)
    }

    async fn tick_clock(&self, epoch: u64) {
        if self.is_live(epoch) {
            self.snapshot.write().await.now = Local::now();
        }
    }

    async fn tick_telemetry(&self, epoch: u64) {
        if !self.is_live(epoch) {
            return;
        }
        let mut rng = self.rng.lock().await;
        let mut snap = self.snapshot.write().await;
        snap.telemetry.tick(&mut *rng, self.config.battery_floor);
        debug!(
            battery = snap.telemetry.battery_percent(),
            signal = snap.telemetry.signal,
            wifi = snap.telemetry.wifi_connected,
            "telemetry tick"
        );
    }
}

/// The status bar view-model and its background jobs.
pub struct StatusIndicator {
    inner: Arc<Inner>,
    tasks: Mutex<Vec<ScheduledTask>>,
    state: StateCell,
}

impl StatusIndicator {
    pub fn new(store: Arc<PhoneStore>, config: StatusBarConfig) -> Self {
        Self::with_rng(store, config, StdRng::from_entropy())
    }

    /// Build with a specific random source (seeded in tests).
    pub fn with_rng(store: Arc<PhoneStore>, config: StatusBarConfig, rng: StdRng) -> Self {
        let snapshot = StatusSnapshot::new(config.initial_battery);
        Self {
            inner: Arc::new(Inner {
                store,
                config,
                snapshot: RwLock::new(snapshot),
                rng: Mutex::new(rng),
                disposed: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
            }),
            tasks: Mutex::new(Vec::new()),
            state: StateCell::new(),
        }
    }

    /// Load the unread counts and start the periodic jobs.
    ///
    /// Mounting an already-mounted indicator restarts its jobs.
    pub async fn mount(&self) -> PsResult<()> {
        let mut tasks = self.tasks.lock().await;
        for task in tasks.iter_mut() {
            task.cancel();
        }
        tasks.clear();

        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.disposed.store(false, Ordering::SeqCst);
        self.state.set(ServiceState::Initializing);

        if let Err(e) = self.inner.refresh_notifications(epoch).await {
            warn!("initial notification count failed: {e}");
        }

        let cfg = &self.inner.config;

        let inner = self.inner.clone();
        tasks.push(ScheduledTask::every(
            "status.notifications",
            cfg.notification_poll(),
            move || {
                let inner = inner.clone();
                async move {
                    if let Err(e) = inner.refresh_notifications(epoch).await {
                        warn!("failed to update notification count: {e}");
                    }
                }
            },
        ));

        let inner = self.inner.clone();
        tasks.push(ScheduledTask::every("status.clock", cfg.clock_tick(), move || {
            let inner = inner.clone();
            async move { inner.tick_clock(epoch).await }
        }));

        let inner = self.inner.clone();
        tasks.push(ScheduledTask::every(
            "status.telemetry",
            cfg.telemetry_tick(),
            move || {
                let inner = inner.clone();
                async move { inner.tick_telemetry(epoch).await }
            },
        ));

        let inner = self.inner.clone();
        let mut events = self.inner.store.event_bus().subscribe();
        tasks.push(ScheduledTask::spawn("status.events", async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.affects_notifications() => {
                        if let Err(e) = inner.refresh_notifications(epoch).await {
                            warn!("event-driven notification refresh failed: {e}");
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("status bar lagged {skipped} events, refreshing");
                        if let Err(e) = inner.refresh_notifications(epoch).await {
                            warn!("notification refresh after {skipped} missed events failed: {e}");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));

        self.state.set(ServiceState::Running);
        info!("status bar mounted with {} jobs", tasks.len());
        Ok(())
    }

    /// Cancel every job. Results still in flight are discarded.
    pub async fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().await;
        for task in tasks.iter_mut() {
            task.cancel();
        }
        tasks.clear();
        self.state.set(ServiceState::Stopped);
        debug!("status bar disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Number of running background jobs.
    pub async fn active_jobs(&self) -> usize {
        self.tasks.lock().await.iter().filter(|t| !t.is_finished()).count()
    }

    /// Re-read unread counts now. Returns false when the result was
    /// discarded because the indicator was disposed.
    pub async fn refresh_notifications(&self) -> PsResult<bool> {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        self.inner.refresh_notifications(epoch).await
    }

    /// Re-read the wall clock now.
    pub async fn tick_clock(&self) {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        self.inner.tick_clock(epoch).await;
    }

    /// Advance the simulated telemetry by one interval now.
    pub async fn tick_telemetry(&self) {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        self.inner.tick_telemetry(epoch).await;
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        self.inner.snapshot.read().await.clone()
    }

    /// Badges actually drawn: the first `max_badges` apps.
    pub async fn visible_badges(&self) -> Vec<AppBadge> {
        let snap = self.inner.snapshot.read().await;
        snap.badges
            .iter()
            .take(self.inner.config.max_badges)
            .cloned()
            .collect()
    }

    /// Tapping the bar itself opens the notifications list.
    pub fn tap(&self) -> Route {
        Route::Notifications
    }

    /// Tapping an app badge.
    pub fn tap_badge(&self, app_name: &str) -> Route {
        Route::for_badge(app_name)
    }
}

#[async_trait]
impl Service for StatusIndicator {
    fn name(&self) -> &str {
        "status_indicator"
    }

    fn state(&self) -> ServiceState {
        self.state.get()
    }

    async fn init(&self) -> PsResult<()> {
        self.mount().await
    }

    async fn shutdown(&self) -> PsResult<()> {
        self.dispose().await;
        Ok(())
    }
}
