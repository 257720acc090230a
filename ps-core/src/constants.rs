//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "Phone Simulator";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory name used under the platform data/config directories.
pub const APP_DIR_NAME: &str = "PhoneSimulator";

/// Default SQLite database file name.
pub const DEFAULT_DB_FILE: &str = "phone_simulator.db";

/// Blob store key holding the serialized notes list.
pub const NOTES_KEY: &str = "notes";

/// Sender name used for messages written by the user.
pub const SELF_SENDER: &str = "You";

/// Keys of the rows in the `settings` table.
pub mod setting_keys {
    pub const THEME: &str = "theme";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const SOUND: &str = "sound";
    pub const USER_NAME: &str = "userName";

    /// All keys written by default-data seeding and by "Reset All Data".
    pub const ALL: &[&str] = &[THEME, NOTIFICATIONS, SOUND, USER_NAME];
}

/// Default values for the seeded settings.
pub mod setting_defaults {
    pub const THEME: &str = "light";
    pub const NOTIFICATIONS: &str = "true";
    pub const SOUND: &str = "true";
    pub const USER_NAME: &str = "Player";

    /// `(key, value)` pairs in seeding order.
    pub const PAIRS: &[(&str, &str)] = &[
        (super::setting_keys::THEME, THEME),
        (super::setting_keys::NOTIFICATIONS, NOTIFICATIONS),
        (super::setting_keys::SOUND, SOUND),
        (super::setting_keys::USER_NAME, USER_NAME),
    ];
}

/// Values stored under the `theme` setting.
pub mod themes {
    pub const LIGHT: &str = "light";
    pub const DARK: &str = "dark";
}

/// App names used on notifications and status bar badges.
pub mod app_names {
    pub const MESSAGES: &str = "Messages";
    pub const CONTACTS: &str = "Contacts";
    pub const SYSTEM: &str = "System";
    pub const SETTINGS: &str = "Settings";
}
