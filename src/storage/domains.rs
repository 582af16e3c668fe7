//! Custom domain repository for JSON storage
//!
//! Manages loading and saving custom domain rules to domains.json

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::backup::DomainRepository;
use crate::error::{WardenError, WardenResult};
use crate::models::CustomDomain;

use super::file_io::{read_json, write_json_atomic};

/// Serializable domain data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct DomainData {
    domains: Vec<CustomDomain>,
}

/// Repository for custom domain persistence
pub struct DomainFileRepository {
    path: PathBuf,
    data: RwLock<Vec<CustomDomain>>,
}

impl DomainFileRepository {
    /// Create an empty repository backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load domains from disk
    pub async fn load(&self) -> WardenResult<()> {
        let file_data: DomainData = read_json(&self.path).await?;
        *self.data.write().await = file_data.domains;
        Ok(())
    }

    /// Count stored domains
    pub async fn count(&self) -> usize {
        self.data.read().await.len()
    }
}

#[async_trait]
impl DomainRepository for DomainFileRepository {
    async fn list_allowlist(&self) -> WardenResult<Vec<CustomDomain>> {
        let data = self.data.read().await;
        Ok(data.iter().filter(|d| d.is_allowlist).cloned().collect())
    }

    async fn list_blocklist(&self) -> WardenResult<Vec<CustomDomain>> {
        let data = self.data.read().await;
        Ok(data.iter().filter(|d| !d.is_allowlist).cloned().collect())
    }

    async fn insert(&self, domain: CustomDomain) -> WardenResult<()> {
        domain
            .validate()
            .map_err(|e| WardenError::Validation(format!("{}: {}", domain.domain, e)))?;

        // The write lock is held across the save so inserts are serialized
        let mut data = self.data.write().await;
        let mut domains = data.clone();
        debug!(domain = %domain.domain, allowlist = domain.is_allowlist, "inserting domain");
        domains.push(domain);

        write_json_atomic(&self.path, &DomainData { domains: domains.clone() }).await?;
        *data = domains;
        Ok(())
    }
}
