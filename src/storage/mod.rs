//! Storage layer for Warden
//!
//! JSON file implementations of the live configuration stores, with atomic
//! writes and automatic directory creation.

pub mod applications;
pub mod blocklists;
pub mod domains;
pub mod file_io;

pub use applications::ApplicationFileRegistry;
pub use blocklists::BlocklistFileStore;
pub use domains::DomainFileRepository;
pub use file_io::{read_json, write_json_atomic};

use std::sync::Arc;

use crate::backup::Collaborators;
use crate::config::paths::WardenPaths;
use crate::error::WardenResult;

/// Main storage coordinator that provides access to all stores
pub struct Storage {
    paths: WardenPaths,
    pub domains: Arc<DomainFileRepository>,
    pub blocklists: Arc<BlocklistFileStore>,
    pub applications: Arc<ApplicationFileRegistry>,
}

impl Storage {
    /// Create a new Storage instance and load all data from disk
    pub async fn open(paths: WardenPaths) -> WardenResult<Self> {
        paths.ensure_directories()?;

        let storage = Self {
            domains: Arc::new(DomainFileRepository::new(paths.domains_file())),
            blocklists: Arc::new(BlocklistFileStore::new(paths.blocklists_file())),
            applications: Arc::new(ApplicationFileRegistry::new(paths.applications_file())),
            paths,
        };

        storage.domains.load().await?;
        storage.applications.load().await?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &WardenPaths {
        &self.paths
    }

    /// Bundle the stores for the backup engines
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.domains.clone(),
            self.blocklists.clone(),
            self.applications.clone(),
        )
    }
}
