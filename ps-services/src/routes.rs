//! Navigation targets.
//!
//! Routes are opaque identifiers a front-end maps to its own screens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ps_core::error::PsError;

/// A screen the shell can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Index,
    Messages,
    Contacts,
    Notes,
    Calculator,
    Settings,
    Notifications,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Index,
        Route::Messages,
        Route::Contacts,
        Route::Notes,
        Route::Calculator,
        Route::Settings,
        Route::Notifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Index => "index",
            Route::Messages => "messages",
            Route::Contacts => "contacts",
            Route::Notes => "notes",
            Route::Calculator => "calculator",
            Route::Settings => "settings",
            Route::Notifications => "notifications",
        }
    }

    /// Where tapping a status bar badge for `app_name` leads.
    ///
    /// System notifications open settings; unknown apps fall back to the
    /// notifications list.
    pub fn for_badge(app_name: &str) -> Route {
        match app_name.to_lowercase().as_str() {
            "messages" => Route::Messages,
            "contacts" => Route::Contacts,
            "system" => Route::Settings,
            _ => Route::Notifications,
        }
    }

    /// Where pressing a notification from `app_name` leads, if anywhere.
    ///
    /// `None` means the notification's own details are shown instead.
    pub fn for_notification(app_name: &str) -> Option<Route> {
        match app_name.to_lowercase().as_str() {
            "messages" => Some(Route::Messages),
            "contacts" => Some(Route::Contacts),
            "settings" => Some(Route::Settings),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = PsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('/').to_lowercase();
        let wanted = if wanted.is_empty() { "index".to_string() } else { wanted };
        Route::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| PsError::validation(format!("unknown route: {s}")))
    }
}
