//! Application registry for JSON storage
//!
//! Manages loading and saving installed applications and their network
//! policy to applications.json

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backup::ApplicationRegistry;
use crate::error::{WardenError, WardenResult};
use crate::models::Application;

use super::file_io::{read_json, write_json_atomic};

/// Serializable application data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ApplicationData {
    applications: Vec<Application>,
}

/// Registry of installed applications
pub struct ApplicationFileRegistry {
    path: PathBuf,
    data: RwLock<Vec<Application>>,
}

impl ApplicationFileRegistry {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load applications from disk
    pub async fn load(&self) -> WardenResult<()> {
        let file_data: ApplicationData = read_json(&self.path).await?;
        *self.data.write().await = file_data.applications;
        Ok(())
    }

    async fn persist(&self, applications: &[Application]) -> WardenResult<()> {
        let file_data = ApplicationData {
            applications: applications.to_vec(),
        };
        write_json_atomic(&self.path, &file_data).await
    }
}

#[async_trait]
impl ApplicationRegistry for ApplicationFileRegistry {
    async fn list_applications(&self) -> WardenResult<Vec<Application>> {
        Ok(self.data.read().await.clone())
    }

    async fn update(&self, application: Application) -> WardenResult<()> {
        let mut data = self.data.write().await;
        let mut applications = data.clone();

        let slot = applications
            .iter_mut()
            .find(|a| a.package_id == application.package_id)
            .ok_or_else(|| WardenError::application_not_found(&application.package_id))?;
        *slot = application;

        self.persist(&applications).await?;
        *data = applications;
        Ok(())
    }
}
