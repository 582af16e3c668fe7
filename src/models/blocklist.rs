//! Blocklist subscription model
//!
//! The blocklist configuration is an ordered list of subscribed host sources.
//! Each source can be ignored, used to deny every host it lists, or used to
//! force-allow them. Subscriptions are identified by their URL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a subscribed host source is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HostState {
    /// Subscription is disabled
    #[default]
    Ignore,
    /// Block every host the source lists
    Deny,
    /// Force-allow every host the source lists
    Allow,
}

impl HostState {
    /// Wire name used in configuration and backup files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::Deny => "DENY",
            Self::Allow => "ALLOW",
        }
    }

    /// Map a stored state name, degrading unknown values to `Ignore`
    pub fn from_backup_str(value: &str) -> Self {
        match value {
            "DENY" => Self::Deny,
            "ALLOW" => Self::Allow,
            _ => Self::Ignore,
        }
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subscribed host source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    pub title: String,
    /// Location of the source
    pub url: String,
    #[serde(default)]
    pub state: HostState,
}

/// The full blocklist configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistConfiguration {
    #[serde(default)]
    pub items: Vec<HostEntry>,
}

impl BlocklistConfiguration {
    /// Add a subscription unless one with the same URL already exists
    ///
    /// The URL identifies a subscription. An existing entry is left exactly
    /// as it is, so a user's later title or state changes survive. Returns
    /// whether the entry was added.
    pub fn add_url(
        &mut self,
        title: impl Into<String>,
        url: impl Into<String>,
        state: HostState,
    ) -> bool {
        let url = url.into();
        if self.contains_url(&url) {
            return false;
        }

        self.items.push(HostEntry {
            title: title.into(),
            url,
            state,
        });
        true
    }

    /// Check whether a subscription with this URL exists
    pub fn contains_url(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url == url)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
