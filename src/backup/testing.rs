//! In-memory collaborators for backup tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{WardenError, WardenResult};
use crate::models::{Application, BlocklistConfiguration, CustomDomain};

use super::traits::{ApplicationRegistry, BlocklistStore, Collaborators, DomainRepository};

#[derive(Default)]
pub struct MemoryDomains {
    pub domains: Mutex<Vec<CustomDomain>>,
    pub fail_reads: bool,
    /// Inserts of this domain fail
    pub reject: Option<String>,
}

impl MemoryDomains {
    pub fn with(domains: Vec<CustomDomain>) -> Self {
        Self {
            domains: Mutex::new(domains),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<CustomDomain> {
        self.domains.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainRepository for MemoryDomains {
    async fn list_allowlist(&self) -> WardenResult<Vec<CustomDomain>> {
        if self.fail_reads {
            return Err(WardenError::Storage("domain query failed".into()));
        }
        Ok(self.snapshot().into_iter().filter(|d| d.is_allowlist).collect())
    }

    async fn list_blocklist(&self) -> WardenResult<Vec<CustomDomain>> {
        if self.fail_reads {
            return Err(WardenError::Storage("domain query failed".into()));
        }
        Ok(self.snapshot().into_iter().filter(|d| !d.is_allowlist).collect())
    }

    async fn insert(&self, domain: CustomDomain) -> WardenResult<()> {
        if self.reject.as_deref() == Some(domain.domain.as_str()) {
            return Err(WardenError::Validation(format!("rejected {}", domain.domain)));
        }
        self.domains.lock().unwrap().push(domain);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBlocklists {
    pub configuration: Mutex<BlocklistConfiguration>,
    pub fail_load: bool,
    pub fail_save: bool,
    pub saves: Mutex<usize>,
}

impl MemoryBlocklists {
    pub fn with(configuration: BlocklistConfiguration) -> Self {
        Self {
            configuration: Mutex::new(configuration),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> BlocklistConfiguration {
        self.configuration.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl BlocklistStore for MemoryBlocklists {
    async fn load(&self) -> WardenResult<BlocklistConfiguration> {
        if self.fail_load {
            return Err(WardenError::Storage("configuration unreadable".into()));
        }
        Ok(self.snapshot())
    }

    async fn save(&self, configuration: &BlocklistConfiguration) -> WardenResult<()> {
        *self.saves.lock().unwrap() += 1;
        if self.fail_save {
            return Err(WardenError::Storage("disk full".into()));
        }
        *self.configuration.lock().unwrap() = configuration.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryApplications {
    pub installed: Mutex<Vec<Application>>,
    pub fail_list: bool,
    pub lists: Mutex<usize>,
    pub updates: Mutex<Vec<String>>,
}

impl MemoryApplications {
    pub fn with(installed: Vec<Application>) -> Self {
        Self {
            installed: Mutex::new(installed),
            ..Default::default()
        }
    }

    pub fn get(&self, package_id: &str) -> Option<Application> {
        self.installed
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.package_id == package_id)
            .cloned()
    }

    pub fn updated_packages(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        *self.lists.lock().unwrap()
    }
}

#[async_trait]
impl ApplicationRegistry for MemoryApplications {
    async fn list_applications(&self) -> WardenResult<Vec<Application>> {
        *self.lists.lock().unwrap() += 1;
        if self.fail_list {
            return Err(WardenError::Storage("package manager unavailable".into()));
        }
        Ok(self.installed.lock().unwrap().clone())
    }

    async fn update(&self, application: Application) -> WardenResult<()> {
        let mut installed = self.installed.lock().unwrap();
        let slot = installed
            .iter_mut()
            .find(|a| a.package_id == application.package_id)
            .ok_or_else(|| WardenError::application_not_found(&application.package_id))?;
        self.updates
            .lock()
            .unwrap()
            .push(application.package_id.clone());
        *slot = application;
        Ok(())
    }
}

/// Fakes plus the bundle the engines consume
pub struct Fixture {
    pub domains: Arc<MemoryDomains>,
    pub blocklists: Arc<MemoryBlocklists>,
    pub applications: Arc<MemoryApplications>,
}

impl Fixture {
    pub fn new(
        domains: MemoryDomains,
        blocklists: MemoryBlocklists,
        applications: MemoryApplications,
    ) -> Self {
        Self {
            domains: Arc::new(domains),
            blocklists: Arc::new(blocklists),
            applications: Arc::new(applications),
        }
    }

    pub fn empty() -> Self {
        Self::new(
            MemoryDomains::default(),
            MemoryBlocklists::default(),
            MemoryApplications::default(),
        )
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.domains.clone(),
            self.blocklists.clone(),
            self.applications.clone(),
        )
    }
}
