//! Section selection for export and restore

use std::fmt;

/// One independently includable/restorable part of a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Settings,
    Domains,
    Blocklists,
    Applications,
}

impl Section {
    /// All sections in the fixed order they are exported and restored
    pub const ALL: [Section; 4] = [
        Section::Settings,
        Section::Domains,
        Section::Blocklists,
        Section::Applications,
    ];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Settings => "settings",
            Self::Domains => "domains",
            Self::Blocklists => "blocklists",
            Self::Applications => "applications",
        };
        write!(f, "{}", name)
    }
}

/// Which sections to include in an export, or to apply on restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupOptions {
    pub settings: bool,
    pub domains: bool,
    pub blocklists: bool,
    pub applications: bool,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl BackupOptions {
    pub fn all() -> Self {
        Self {
            settings: true,
            domains: true,
            blocklists: true,
            applications: true,
        }
    }

    pub fn none() -> Self {
        Self {
            settings: false,
            domains: false,
            blocklists: false,
            applications: false,
        }
    }

    /// Select a single section
    pub fn only(section: Section) -> Self {
        Self::none().with(section, true)
    }

    /// Toggle one section
    pub fn with(mut self, section: Section, enabled: bool) -> Self {
        match section {
            Section::Settings => self.settings = enabled,
            Section::Domains => self.domains = enabled,
            Section::Blocklists => self.blocklists = enabled,
            Section::Applications => self.applications = enabled,
        }
        self
    }

    pub fn includes(&self, section: Section) -> bool {
        match section {
            Section::Settings => self.settings,
            Section::Domains => self.domains,
            Section::Blocklists => self.blocklists,
            Section::Applications => self.applications,
        }
    }

    /// True when no section is selected
    pub fn is_empty(&self) -> bool {
        !Section::ALL.iter().any(|s| self.includes(*s))
    }
}
