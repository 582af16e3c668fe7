//! Installed application model
//!
//! An application known to the firewall and the network policy applied to it.
//! Descriptive fields (name, uid) come from the platform; the policy fields
//! are what backups carry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An installed application with its network policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Platform package identifier
    pub package_id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Platform user id
    #[serde(default)]
    pub uid: u32,

    #[serde(default)]
    pub is_system: bool,

    /// Allowed to use Wi-Fi/ethernet
    pub internet_access: bool,

    /// Allowed to use cellular data
    pub cellular_access: bool,

    /// Routed around the VPN entirely
    #[serde(default)]
    pub bypass_vpn: bool,

    #[serde(default)]
    pub is_pinned: bool,
}

impl Application {
    /// Create an application with full network access
    pub fn new(package_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            name: name.into(),
            uid: 0,
            is_system: false,
            internet_access: true,
            cellular_access: true,
            bypass_vpn: false,
            is_pinned: false,
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.package_id)
        } else {
            write!(f, "{} ({})", self.name, self.package_id)
        }
    }
}
