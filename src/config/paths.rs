//! Path management for Warden
//!
//! Provides XDG-compliant path resolution for configuration, data, and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `WARDEN_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/warden` or `~/.config/warden`
//! 3. Windows: `%APPDATA%\warden`

use std::path::PathBuf;

use crate::error::WardenError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "WARDEN_DATA_DIR";

/// Manages all paths used by Warden
#[derive(Debug, Clone)]
pub struct WardenPaths {
    /// Base directory for all Warden data
    base_dir: PathBuf,
}

impl WardenPaths {
    /// Create a new WardenPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, WardenError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create WardenPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/warden/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/warden/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory (~/.config/warden/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to domains.json (custom allowlist/blocklist rules)
    pub fn domains_file(&self) -> PathBuf {
        self.data_dir().join("domains.json")
    }

    /// Get the path to blocklists.json (subscribed blocklist sources)
    pub fn blocklists_file(&self) -> PathBuf {
        self.data_dir().join("blocklists.json")
    }

    /// Get the path to applications.json (per-application network policy)
    pub fn applications_file(&self) -> PathBuf {
        self.data_dir().join("applications.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), WardenError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WardenError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| WardenError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| WardenError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, WardenError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                WardenError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("warden"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, WardenError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| WardenError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("warden"))
}
