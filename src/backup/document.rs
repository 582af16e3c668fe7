//! Backup document format
//!
//! The portable, versioned data contract written by export and read by
//! import. Every list is independently restorable: no record refers to
//! another by position or identity.
//!
//! Reading is forward compatible: unknown fields at any level are ignored,
//! and `applications` defaults to an empty list for documents written before
//! the field existed.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::settings::{Settings, DAY_MILLIS, DEFAULT_CUSTOM_COLOR};
use crate::error::{WardenError, WardenResult};
use crate::models::{Application, CustomDomain, HostEntry, HostState};

/// Current backup schema version (not the application version)
pub const BACKUP_SCHEMA_VERSION: i32 = 1;

fn default_version() -> i32 {
    BACKUP_SCHEMA_VERSION
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A complete backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    /// Schema version of the document
    #[serde(default = "default_version")]
    pub version: i32,

    /// Creation time in epoch milliseconds; informational only
    #[serde(default = "now_millis")]
    pub timestamp: i64,

    pub settings: SettingsBackup,

    pub custom_domains: Vec<CustomDomainBackup>,

    pub custom_blocklists: Vec<CustomBlocklistBackup>,

    #[serde(default)]
    pub applications: Vec<ApplicationBackup>,
}

impl BackupDocument {
    /// Assemble a document stamped with the current schema version and time
    pub fn new(
        settings: SettingsBackup,
        custom_domains: Vec<CustomDomainBackup>,
        custom_blocklists: Vec<CustomBlocklistBackup>,
        applications: Vec<ApplicationBackup>,
    ) -> Self {
        Self {
            version: BACKUP_SCHEMA_VERSION,
            timestamp: now_millis(),
            settings,
            custom_domains,
            custom_blocklists,
            applications,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> WardenResult<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| WardenError::Export(format!("Failed to serialize backup: {}", e)))
    }

    /// Deserialize and validate a document from raw bytes
    pub fn from_slice(bytes: &[u8]) -> WardenResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| WardenError::Format(format!("Backup is not valid UTF-8: {}", e)))?;

        let document: BackupDocument = serde_json::from_str(text)
            .map_err(|e| WardenError::Format(format!("Failed to parse backup: {}", e)))?;

        document.validate()?;
        Ok(document)
    }

    /// Check structural invariants that serde cannot express
    pub fn validate(&self) -> WardenResult<()> {
        if self.version < 1 {
            return Err(WardenError::Format(format!(
                "Invalid backup version: {}",
                self.version
            )));
        }
        Ok(())
    }

    /// Whether the document was written by a newer schema than this build knows
    pub fn is_newer_than_supported(&self) -> bool {
        self.version > BACKUP_SCHEMA_VERSION
    }
}

/// Settings section of a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBackup {
    pub automatic_theme: bool,
    pub dark_theme: bool,
    pub use_dynamic_icons: bool,
    pub dynamic_theme: bool,
    pub amoled_theme: bool,
    pub custom_color: i32,
    pub screen_protection: bool,
    pub block_port80: bool,
    pub logs: bool,
    pub show_system_packages: bool,
    pub show_offline_packages: bool,
    #[serde(rename = "wiFiDefault")]
    pub wifi_default: bool,
    pub cellular_default: bool,
    pub start_on_boot: bool,
    pub allow_local: bool,
    pub block_wifi_when_screen_off: bool,
    pub block_cellular_when_screen_off: bool,
    pub permanent_notification: bool,
    pub network_speed_monitor: bool,
    pub send_notification_on_install: bool,
    pub malware_protection: bool,
    pub ad_blocker: bool,
    pub tracker_protection: bool,
    /// Milliseconds
    pub auto_update_interval: i64,
}

impl SettingsBackup {
    /// Fixed values written when settings are excluded from an export.
    ///
    /// These never depend on the live settings, so an excluded section
    /// cannot leak them into the document.
    pub fn placeholder() -> Self {
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

    /// Rebuild a live settings value from the snapshot
    pub fn to_settings(&self) -> Settings {
        Settings {
            automatic_theme: self.automatic_theme,
            dark_theme: self.dark_theme,
            use_dynamic_icons: self.use_dynamic_icons,
            dynamic_theme: self.dynamic_theme,
            amoled_theme: self.amoled_theme,
            custom_color: self.custom_color,
            screen_protection: self.screen_protection,
            block_port80: self.block_port80,
            logs: self.logs,
            show_system_packages: self.show_system_packages,
            show_offline_packages: self.show_offline_packages,
            wifi_default: self.wifi_default,
            cellular_default: self.cellular_default,
            start_on_boot: self.start_on_boot,
            allow_local: self.allow_local,
            block_wifi_when_screen_off: self.block_wifi_when_screen_off,
            block_cellular_when_screen_off: self.block_cellular_when_screen_off,
            permanent_notification: self.permanent_notification,
            network_speed_monitor: self.network_speed_monitor,
            send_notification_on_install: self.send_notification_on_install,
            malware_protection: self.malware_protection,
            ad_blocker: self.ad_blocker,
            tracker_protection: self.tracker_protection,
            auto_update_interval: self.auto_update_interval,
        }
    }
}

impl From<&Settings> for SettingsBackup {
    fn from(s: &Settings) -> Self {
        Self {
            automatic_theme: s.automatic_theme,
            dark_theme: s.dark_theme,
            use_dynamic_icons: s.use_dynamic_icons,
            dynamic_theme: s.dynamic_theme,
            amoled_theme: s.amoled_theme,
            custom_color: s.custom_color,
            screen_protection: s.screen_protection,
            block_port80: s.block_port80,
            logs: s.logs,
            show_system_packages: s.show_system_packages,
            show_offline_packages: s.show_offline_packages,
            wifi_default: s.wifi_default,
            cellular_default: s.cellular_default,
            start_on_boot: s.start_on_boot,
            allow_local: s.allow_local,
            block_wifi_when_screen_off: s.block_wifi_when_screen_off,
            block_cellular_when_screen_off: s.block_cellular_when_screen_off,
            permanent_notification: s.permanent_notification,
            network_speed_monitor: s.network_speed_monitor,
            send_notification_on_install: s.send_notification_on_install,
            malware_protection: s.malware_protection,
            ad_blocker: s.ad_blocker,
            tracker_protection: s.tracker_protection,
            auto_update_interval: s.auto_update_interval,
        }
    }
}

/// A custom domain rule as stored in a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomainBackup {
    pub domain: String,
    pub description: String,
    pub is_regex: bool,
    pub is_allowlist: bool,
    pub is_enabled: bool,
}

impl CustomDomainBackup {
    /// Convert into a new live rule; the repository-side id is freshly assigned
    pub fn to_domain(&self) -> CustomDomain {
        let mut domain = CustomDomain::new(self.domain.clone(), self.is_allowlist)
            .with_description(self.description.clone());
        domain.is_regex = self.is_regex;
        domain.is_enabled = self.is_enabled;
        domain
    }
}

impl From<&CustomDomain> for CustomDomainBackup {
    fn from(d: &CustomDomain) -> Self {
        Self {
            domain: d.domain.clone(),
            description: d.description.clone(),
            is_regex: d.is_regex,
            is_allowlist: d.is_allowlist,
            is_enabled: d.is_enabled,
        }
    }
}

/// A blocklist subscription as stored in a backup
///
/// `state` is kept as raw text so that unknown values survive parsing and
/// degrade to `IGNORE` on restore instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBlocklistBackup {
    pub title: String,
    pub url: String,
    pub state: String,
}

impl CustomBlocklistBackup {
    /// The restored state; unrecognized values map to `Ignore`
    pub fn host_state(&self) -> HostState {
        HostState::from_backup_str(&self.state)
    }
}

impl From<&HostEntry> for CustomBlocklistBackup {
    fn from(entry: &HostEntry) -> Self {
        Self {
            title: entry.title.clone(),
            url: entry.url.clone(),
            state: entry.state.as_str().to_string(),
        }
    }
}

/// Per-application network policy as stored in a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBackup {
    #[serde(rename = "packageID")]
    pub package_id: String,
    pub internet_access: bool,
    pub cellular_access: bool,
    #[serde(default)]
    pub bypass_vpn: bool,
    #[serde(default)]
    pub is_pinned: bool,
}

impl From<&Application> for ApplicationBackup {
    fn from(app: &Application) -> Self {
        Self {
            package_id: app.package_id.clone(),
            internet_access: app.internet_access,
            cellular_access: app.cellular_access,
            bypass_vpn: app.bypass_vpn,
            is_pinned: app.is_pinned,
        }
    }
}
