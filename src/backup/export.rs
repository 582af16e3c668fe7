//! Backup export
//!
//! Reads the live stores, assembles a [`BackupDocument`] and writes it to a
//! byte sink. Export is all or nothing: any store read or sink write failure
//! aborts the call, and whatever bytes already reached the sink must be
//! treated as invalid by its owner.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, instrument};

use crate::config::settings::Settings;
use crate::error::{WardenError, WardenResult};

use super::document::{
    ApplicationBackup, BackupDocument, CustomBlocklistBackup, CustomDomainBackup, SettingsBackup,
};
use super::options::BackupOptions;
use super::traits::Collaborators;

/// Writes backups of the live configuration
pub struct BackupExporter {
    collaborators: Collaborators,
}

impl BackupExporter {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Export a backup to `sink` and flush it
    ///
    /// `settings` is the caller's authoritative copy; the exporter never reads
    /// a settings store itself. Excluded sections are written as placeholders:
    /// fixed default settings or an empty list.
    #[instrument(skip_all)]
    pub async fn export<W>(
        &self,
        sink: &mut W,
        settings: &Settings,
        options: BackupOptions,
    ) -> WardenResult<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let result = self.write_document(sink, settings, options).await;
        match &result {
            Ok(()) => info!("Backup exported successfully"),
            Err(e) => error!(error = %e, "Failed to export backup"),
        }
        result
    }

    async fn write_document<W>(
        &self,
        sink: &mut W,
        settings: &Settings,
        options: BackupOptions,
    ) -> WardenResult<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let document = self.collect(settings, options).await?;
        let bytes = document.to_json_pretty()?;

        sink.write_all(&bytes)
            .await
            .map_err(|e| WardenError::Io(format!("Failed to write backup: {}", e)))?;
        sink.flush()
            .await
            .map_err(|e| WardenError::Io(format!("Failed to flush backup: {}", e)))?;

        debug!(bytes = bytes.len(), "backup written");
        Ok(())
    }

    /// Assemble the document without writing it anywhere
    pub async fn collect(
        &self,
        settings: &Settings,
        options: BackupOptions,
    ) -> WardenResult<BackupDocument> {
        let settings = if options.settings {
            SettingsBackup::from(settings)
        } else {
            SettingsBackup::placeholder()
        };

        let custom_domains = if options.domains {
            self.collect_domains().await?
        } else {
            Vec::new()
        };

        let custom_blocklists = if options.blocklists {
            self.collect_blocklists().await?
        } else {
            Vec::new()
        };

        let applications = if options.applications {
            self.collect_applications().await?
        } else {
            Vec::new()
        };

        debug!(
            domains = custom_domains.len(),
            blocklists = custom_blocklists.len(),
            applications = applications.len(),
            "collected backup sections"
        );

        Ok(BackupDocument::new(
            settings,
            custom_domains,
            custom_blocklists,
            applications,
        ))
    }

    async fn collect_domains(&self) -> WardenResult<Vec<CustomDomainBackup>> {
        let domains = &self.collaborators.domains;
        let allowlist = domains
            .list_allowlist()
            .await
            .map_err(|e| WardenError::collaborator("Domain repository", e.to_string()))?;
        let blocklist = domains
            .list_blocklist()
            .await
            .map_err(|e| WardenError::collaborator("Domain repository", e.to_string()))?;

        Ok(allowlist
            .iter()
            .chain(blocklist.iter())
            .map(CustomDomainBackup::from)
            .collect())
    }

    async fn collect_blocklists(&self) -> WardenResult<Vec<CustomBlocklistBackup>> {
        let configuration = self
            .collaborators
            .blocklists
            .load()
            .await
            .map_err(|e| WardenError::collaborator("Blocklist configuration", e.to_string()))?;

        Ok(configuration
            .items
            .iter()
            .map(CustomBlocklistBackup::from)
            .collect())
    }

    async fn collect_applications(&self) -> WardenResult<Vec<ApplicationBackup>> {
        let applications = self
            .collaborators
            .applications
            .list_applications()
            .await
            .map_err(|e| WardenError::collaborator("Application registry", e.to_string()))?;

        Ok(applications.iter().map(ApplicationBackup::from).collect())
    }
}
