//! Collaborator interfaces consumed by the backup engines.
//!
//! The engines never reach for global state: every live store they read or
//! mutate is injected through these traits. Implementations own their
//! concurrency discipline (a repository is expected to serialize its own
//! writes); the engines take no locks.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WardenResult;
use crate::models::{Application, BlocklistConfiguration, CustomDomain};

/// Store of user-defined domain rules.
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Domains exempt from blocking.
    async fn list_allowlist(&self) -> WardenResult<Vec<CustomDomain>>;

    /// Domains that are force-blocked.
    async fn list_blocklist(&self) -> WardenResult<Vec<CustomDomain>>;

    /// Insert a rule. Never deduplicates.
    async fn insert(&self, domain: CustomDomain) -> WardenResult<()>;
}

/// Persistence for the blocklist subscription configuration.
#[async_trait]
pub trait BlocklistStore: Send + Sync {
    async fn load(&self) -> WardenResult<BlocklistConfiguration>;

    async fn save(&self, configuration: &BlocklistConfiguration) -> WardenResult<()>;
}

/// Registry of installed applications and their network policy.
#[async_trait]
pub trait ApplicationRegistry: Send + Sync {
    /// Every currently installed application.
    async fn list_applications(&self) -> WardenResult<Vec<Application>>;

    /// Persist an installed application's policy.
    async fn update(&self, application: Application) -> WardenResult<()>;
}

/// The set of live stores a backup is taken from and restored into.
#[derive(Clone)]
pub struct Collaborators {
    pub domains: Arc<dyn DomainRepository>,
    pub blocklists: Arc<dyn BlocklistStore>,
    pub applications: Arc<dyn ApplicationRegistry>,
}

impl Collaborators {
    pub fn new(
        domains: Arc<dyn DomainRepository>,
        blocklists: Arc<dyn BlocklistStore>,
        applications: Arc<dyn ApplicationRegistry>,
    ) -> Self {
        Self {
            domains,
            blocklists,
            applications,
        }
    }
}
