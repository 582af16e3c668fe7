//! Blocklist configuration store for JSON storage
//!
//! Manages loading and saving blocklist subscriptions to blocklists.json

use std::path::PathBuf;

use async_trait::async_trait;

use crate::backup::BlocklistStore;
use crate::error::WardenResult;
use crate::models::BlocklistConfiguration;

use super::file_io::{read_json, write_json_atomic};

/// Store for the blocklist subscription configuration
pub struct BlocklistFileStore {
    path: PathBuf,
}

impl BlocklistFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl BlocklistStore for BlocklistFileStore {
    async fn load(&self) -> WardenResult<BlocklistConfiguration> {
        read_json(&self.path).await
    }

    async fn save(&self, configuration: &BlocklistConfiguration) -> WardenResult<()> {
        write_json_atomic(&self.path, configuration).await
    }
}
