//! Home screen: greeting and app grid.

use std::sync::Arc;

use chrono::{DateTime, Local, Timelike};
use serde::Serialize;
use tracing::{debug, warn};

use ps_core::constants::{setting_defaults, setting_keys};

use super::{Alert, ScreenResult, ViewGuard};
use crate::format;
use crate::routes::Route;
use crate::store::PhoneStore;

/// One icon on the home grid or dock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppIcon {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Screen the icon opens; `None` for apps that are not built yet.
    pub route: Option<Route>,
}

const fn app(name: &'static str, icon: &'static str, color: &'static str, route: Option<Route>) -> AppIcon {
    AppIcon { name, icon, color, route }
}

/// The twelve grid icons in display order.
pub const APPS: [AppIcon; 12] = [
    app("Messages", "comment", "#34C759", Some(Route::Messages)),
    app("Contacts", "user", "#007AFF", Some(Route::Contacts)),
    app("Calculator", "calculator", "#FF9500", Some(Route::Calculator)),
    app("Camera", "camera", "#5856D6", None),
    app("Gallery", "photo", "#FF2D92", None),
    app("Weather", "cloud", "#5AC8FA", None),
    app("Clock", "clock-o", "#FF3B30", None),
    app("Notes", "sticky-note", "#FFCC02", Some(Route::Notes)),
    app("Music", "music", "#FF2D92", None),
    app("Games", "gamepad", "#30D158", None),
    app("Browser", "globe", "#007AFF", None),
    app("Settings", "cog", "#8E8E93", Some(Route::Settings)),
];

/// Quick-action dock below the grid.
pub const DOCK: [AppIcon; 4] = [
    app("Phone", "phone", "#34C759", None),
    app("Messages", "comment", "#007AFF", Some(Route::Messages)),
    app("Camera", "camera", "#5856D6", None),
    app("Music", "music", "#FF2D92", None),
];

/// What tapping an icon does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Launch {
    Open(Route),
    Alert(Alert),
}

impl AppIcon {
    pub fn launch(&self) -> Launch {
        match self.route {
            Some(route) => Launch::Open(route),
            None => Launch::Alert(Alert::new(self.name, format!("{} app coming soon!", self.name))),
        }
    }
}

/// Home screen state.
pub struct HomeScreen {
    store: Arc<PhoneStore>,
    guard: ViewGuard,
    user_name: String,
}

impl HomeScreen {
    pub fn new(store: Arc<PhoneStore>) -> Self {
        Self {
            store,
            guard: ViewGuard::new(),
            user_name: setting_defaults::USER_NAME.to_string(),
        }
    }

    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    /// Initialize the store and read the user name.
    ///
    /// Failures are logged and the default name is kept.
    pub async fn load(&mut self) {
        match self.store.get_setting(setting_keys::USER_NAME).await {
            Ok(name) => {
                if !self.guard.is_mounted() {
                    debug!("home unmounted, dropping user name");
                    return;
                }
                if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                    self.user_name = name;
                }
            }
            Err(e) => warn!("failed to initialize home screen: {e}"),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// `Good morning, Player!` style greeting for `now`.
    pub fn greeting(&self, now: &DateTime<Local>) -> String {
        format!("Good {}, {}!", format::time_of_day(now.hour()), self.user_name)
    }

    pub fn date_label(&self, now: &DateTime<Local>) -> String {
        format::long_date(now)
    }

    pub fn apps(&self) -> &'static [AppIcon] {
        &APPS
    }

    pub fn dock(&self) -> &'static [AppIcon] {
        &DOCK
    }

    /// Tap an icon by name (case-insensitive), grid first, then dock.
    pub fn launch(&self, name: &str) -> ScreenResult<Launch> {
        APPS.iter()
            .chain(DOCK.iter())
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
            .map(AppIcon::launch)
            .ok_or_else(|| Alert::new("Error", format!("No app named {name}")))
    }
}
