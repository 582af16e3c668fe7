//! Merge rules applied while restoring records into live stores
//!
//! - Domains: always appended, never deduplicated.
//! - Blocklists: new URLs are added to the loaded configuration; URLs that
//!   are already subscribed keep their live title and state.
//! - Applications: restored only onto applications that are installed now.

use std::collections::HashMap;

use crate::models::{Application, BlocklistConfiguration};

use super::document::{ApplicationBackup, CustomBlocklistBackup};

/// Counts from merging subscriptions into a configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlocklistMerge {
    pub added: usize,
    /// Already subscribed; the live entry was left untouched
    pub skipped: usize,
}

/// Add every backed-up subscription whose URL is not subscribed yet, in order
pub fn merge_blocklists(
    configuration: &mut BlocklistConfiguration,
    records: &[CustomBlocklistBackup],
) -> BlocklistMerge {
    let mut merge = BlocklistMerge::default();
    for record in records {
        if configuration.add_url(record.title.clone(), record.url.clone(), record.host_state()) {
            merge.added += 1;
        } else {
            merge.skipped += 1;
        }
    }
    merge
}

/// Installed applications keyed by package identifier
pub struct InstalledIndex<'a> {
    by_package: HashMap<&'a str, &'a Application>,
}

impl<'a> InstalledIndex<'a> {
    pub fn new(installed: &'a [Application]) -> Self {
        let by_package = installed
            .iter()
            .map(|app| (app.package_id.as_str(), app))
            .collect();
        Self { by_package }
    }

    /// The installed application a record applies to, if any
    pub fn find(&self, record: &ApplicationBackup) -> Option<&'a Application> {
        self.by_package.get(record.package_id.as_str()).copied()
    }
}

/// Copy the backed-up policy fields onto an installed application
///
/// Descriptive fields (name, uid, system flag) stay as installed.
pub fn apply_policy(installed: &Application, record: &ApplicationBackup) -> Application {
    Application {
        internet_access: record.internet_access,
        cellular_access: record.cellular_access,
        bypass_vpn: record.bypass_vpn,
        is_pinned: record.is_pinned,
        ..installed.clone()
    }
}
