//! Settings screen.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use ps_core::constants::{setting_defaults, setting_keys, themes, APP_VERSION};
use ps_models::models::setting::parse_bool;

use super::{Alert, ScreenResult, ViewGuard};
use crate::store::PhoneStore;

/// Longest user name the name prompt accepts.
pub const MAX_USER_NAME_CHARS: usize = 50;

/// What an action row does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SettingAction {
    EditUserName,
    ShowStorage,
    ShowAbout,
    ResetAll,
}

/// The control a settings row renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SettingKind {
    Toggle(bool),
    Text(String),
    Action(SettingAction),
}

/// One row of the settings list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingItem {
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub kind: SettingKind,
}

/// Result of pressing an action row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Open the name editor, pre-filled with the current name.
    PromptUserName(String),
    /// Show an informational alert.
    Show(Alert),
    /// Ask for confirmation, then call [`SettingsScreen::reset_all`].
    Confirm(Alert),
}

const STORAGE_SUMMARY: &str =
    "App data: ~2.5 MB\nMessages: ~1.2 MB\nContacts: ~0.8 MB\nSettings: ~0.1 MB\n\nTotal: ~4.6 MB";

/// Settings screen state.
pub struct SettingsScreen {
    store: Arc<PhoneStore>,
    guard: ViewGuard,
    items: Vec<SettingItem>,
}

impl SettingsScreen {
    pub fn new(store: Arc<PhoneStore>) -> Self {
        Self {
            store,
            guard: ViewGuard::new(),
            items: Vec::new(),
        }
    }

    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    /// Read the four stored settings and rebuild the rows.
    pub async fn load(&mut self) -> ScreenResult<()> {
        let all = self
            .store
            .get_all_settings()
            .await
            .map_err(|e| Alert::from_error("Failed to load settings", &e))?;
        if !self.guard.is_mounted() {
            debug!("settings unmounted, dropping load result");
            return Ok(());
        }

        let get = |key: &str| all.get(key).map(String::as_str);
        let user_name = get(setting_keys::USER_NAME)
            .filter(|v| !v.is_empty())
            .unwrap_or(setting_defaults::USER_NAME);
        let theme = get(setting_keys::THEME).unwrap_or(setting_defaults::THEME);

        self.items = vec![
            SettingItem {
                key: setting_keys::USER_NAME,
                title: "User Name",
                icon: "user",
                kind: SettingKind::Text(user_name.to_string()),
            },
            SettingItem {
                key: setting_keys::THEME,
                title: "Dark Mode",
                icon: "moon-o",
                kind: SettingKind::Toggle(theme == themes::DARK),
            },
            SettingItem {
                key: setting_keys::NOTIFICATIONS,
                title: "Notifications",
                icon: "bell",
                kind: SettingKind::Toggle(get(setting_keys::NOTIFICATIONS).is_some_and(parse_bool)),
            },
            SettingItem {
                key: setting_keys::SOUND,
                title: "Sound Effects",
                icon: "volume-up",
                kind: SettingKind::Toggle(get(setting_keys::SOUND).is_some_and(parse_bool)),
            },
            SettingItem {
                key: "storage",
                title: "Storage Usage",
                icon: "database",
                kind: SettingKind::Action(SettingAction::ShowStorage),
            },
            SettingItem {
                key: "about",
                title: "About",
                icon: "info-circle",
                kind: SettingKind::Action(SettingAction::ShowAbout),
            },
            SettingItem {
                key: "reset",
                title: "Reset All Data",
                icon: "trash",
                kind: SettingKind::Action(SettingAction::ResetAll),
            },
        ];
        Ok(())
    }

    pub fn items(&self) -> &[SettingItem] {
        &self.items
    }

    pub fn item(&self, key: &str) -> Option<&SettingItem> {
        self.items.iter().find(|i| i.key == key)
    }

    /// Current user name as shown in the list.
    pub fn user_name(&self) -> &str {
        match self.item(setting_keys::USER_NAME).map(|i| &i.kind) {
            Some(SettingKind::Text(name)) => name,
            _ => setting_defaults::USER_NAME,
        }
    }

    /// Flip a toggle row.
    ///
    /// Dark Mode is stored as the `theme` value `dark`/`light` and answers
    /// with a restart hint.
    pub async fn set_toggle(&mut self, key: &str, on: bool) -> ScreenResult<Option<Alert>> {
        match self.item(key).map(|i| &i.kind) {
            Some(SettingKind::Toggle(_)) => {}
            _ => return Err(Alert::invalid(format!("{key} is not a toggle"))),
        }

        let value = if key == setting_keys::THEME {
            if on { themes::DARK } else { themes::LIGHT }
        } else if on {
            "true"
        } else {
            "false"
        };

        self.store
            .set_setting(key, value)
            .await
            .map_err(|e| Alert::from_error("Failed to update setting", &e))?;
        self.load().await?;

        Ok((key == setting_keys::THEME)
            .then(|| Alert::new("Theme Changed", "Please restart the app to see the changes.")))
    }

    /// Save a new user name. Blank or over-long names are rejected.
    pub async fn save_user_name(&mut self, name: &str) -> ScreenResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Alert::invalid("Please enter a name"));
        }
        if name.chars().count() > MAX_USER_NAME_CHARS {
            return Err(Alert::invalid(format!(
                "Names are limited to {MAX_USER_NAME_CHARS} characters"
            )));
        }
        self.store
            .set_setting(setting_keys::USER_NAME, name)
            .await
            .map_err(|e| Alert::from_error("Failed to update setting", &e))?;
        self.load().await
    }

    /// Press an action row (the User Name row counts as one).
    pub fn activate(&self, action: SettingAction) -> ActionOutcome {
        match action {
            SettingAction::EditUserName => ActionOutcome::PromptUserName(self.user_name().to_string()),
            SettingAction::ShowStorage => ActionOutcome::Show(Alert::new("Storage Usage", STORAGE_SUMMARY)),
            SettingAction::ShowAbout => ActionOutcome::Show(Alert::new(
                "About Phone Simulator",
                format!(
                    "Version: {APP_VERSION}\n\nA mobile phone simulator game featuring multiple interactive apps."
                ),
            )),
            SettingAction::ResetAll => ActionOutcome::Confirm(Alert::new(
                "Reset All Data",
                "This will delete all messages, contacts, and reset all settings. This action cannot be undone.",
            )),
        }
    }

    /// Write the four default settings back.
    pub async fn reset_all(&mut self) -> ScreenResult<Alert> {
        for (key, value) in setting_defaults::PAIRS {
            self.store
                .set_setting(key, value)
                .await
                .map_err(|e| Alert::from_error("Failed to reset data", &e))?;
        }
        info!("settings reset to defaults");
        self.load().await?;
        Ok(Alert::new("Success", "All data has been reset to defaults."))
    }
}
