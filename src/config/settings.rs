//! User settings for Warden
//!
//! The live firewall settings: theme preferences, default network access for
//! new applications, screen-off blocking, protection toggles and the blocklist
//! auto-update interval.

use serde::{Deserialize, Serialize};

use super::paths::WardenPaths;
use crate::error::WardenError;

/// One day in milliseconds
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Default accent color (ARGB)
pub const DEFAULT_CUSTOM_COLOR: i32 = -7896468;

/// User settings for Warden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Follow the system light/dark theme
    pub automatic_theme: bool,
    /// Force the dark theme when `automatic_theme` is off
    pub dark_theme: bool,
    pub use_dynamic_icons: bool,
    /// Derive the palette from the wallpaper
    pub dynamic_theme: bool,
    pub amoled_theme: bool,
    /// Accent color as a signed ARGB integer
    pub custom_color: i32,
    pub screen_protection: bool,
    /// Block plain HTTP traffic
    pub block_port80: bool,
    /// Record a packet log
    pub logs: bool,
    pub show_system_packages: bool,
    pub show_offline_packages: bool,
    /// Default Wi-Fi access for newly installed applications
    pub wifi_default: bool,
    /// Default cellular access for newly installed applications
    pub cellular_default: bool,
    pub start_on_boot: bool,
    /// Allow traffic to the local network
    pub allow_local: bool,
    pub block_wifi_when_screen_off: bool,
    pub block_cellular_when_screen_off: bool,
    pub permanent_notification: bool,
    pub network_speed_monitor: bool,
    pub send_notification_on_install: bool,
    pub malware_protection: bool,
    pub ad_blocker: bool,
    pub tracker_protection: bool,
    /// Blocklist auto-update interval in milliseconds
    pub auto_update_interval: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            automatic_theme: true,
            dark_theme: false,
            use_dynamic_icons: false,
            dynamic_theme: false,
            amoled_theme: false,
            custom_color: DEFAULT_CUSTOM_COLOR,
            screen_protection: false,
            block_port80: false,
            logs: false,
            show_system_packages: false,
            show_offline_packages: false,
            wifi_default: true,
            cellular_default: true,
            start_on_boot: true,
            allow_local: true,
            block_wifi_when_screen_off: false,
            block_cellular_when_screen_off: false,
            permanent_notification: false,
            network_speed_monitor: false,
            send_notification_on_install: false,
            malware_protection: false,
            ad_blocker: false,
            tracker_protection: false,
            auto_update_interval: DAY_MILLIS,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &WardenPaths) -> Result<Self, WardenError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                WardenError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                WardenError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WardenPaths) -> Result<(), WardenError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            WardenError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            WardenError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.automatic_theme);
        assert!(settings.start_on_boot);
        assert_eq!(settings.custom_color, DEFAULT_CUSTOM_COLOR);
        assert_eq!(settings.auto_update_interval, 86_400_000);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WardenPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.ad_blocker = true;
        settings.custom_color = 0x00FF_00FF;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"dark_theme": true}"#).unwrap();
        assert!(settings.dark_theme);
        assert!(settings.allow_local);
        assert_eq!(settings.auto_update_interval, DAY_MILLIS);
    }

    #[test]
    fn test_load_without_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WardenPaths::with_base_dir(temp_dir.path().to_path_buf());

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, Settings::default());
        assert!(!paths.settings_file().exists());
    }
}
