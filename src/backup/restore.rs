//! Backup restoration
//!
//! Parses a backup document and reconciles the requested sections into the
//! live stores. Only reading and parsing the source can fail the call; after
//! a successful parse every section runs as an independent step, and a
//! failing record or section is logged and recorded in the [`RestoreReport`]
//! without blocking the steps that follow.
//!
//! Steps run sequentially in a fixed order (settings, domains, blocklists,
//! applications) and nothing is rolled back: if the enclosing task is
//! cancelled, stores mutated by earlier steps keep their new state.

use chrono::{DateTime, TimeZone, Utc};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, error, info, instrument, warn};

use crate::config::settings::Settings;
use crate::error::{WardenError, WardenResult};

use super::document::{
    ApplicationBackup, BackupDocument, CustomBlocklistBackup, CustomDomainBackup,
    BACKUP_SCHEMA_VERSION,
};
use super::options::{BackupOptions, Section};
use super::reconcile::{apply_policy, merge_blocklists, InstalledIndex};
use super::report::{RestoreReport, SectionOutcome};
use super::traits::Collaborators;

/// A parsed document together with what restoring it did
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub document: BackupDocument,
    pub report: RestoreReport,
}

/// Restores backups into the live configuration
pub struct BackupRestorer {
    collaborators: Collaborators,
}

impl BackupRestorer {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Read the whole source and parse it as a backup document
    pub async fn read_document<R>(source: &mut R) -> WardenResult<BackupDocument>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| WardenError::Io(format!("Failed to read backup: {}", e)))?;

        let document = BackupDocument::from_slice(&bytes)?;
        if document.is_newer_than_supported() {
            warn!(
                version = document.version,
                supported = BACKUP_SCHEMA_VERSION,
                "backup was written by a newer version; unknown fields are ignored"
            );
        }
        Ok(document)
    }

    /// Parse a backup without touching any store
    pub async fn inspect<R>(source: &mut R) -> WardenResult<BackupInspection>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let document = Self::read_document(source).await?;
        Ok(BackupInspection::from(&document))
    }

    /// Restore the requested sections and return the parsed document
    ///
    /// `on_settings_restored` receives the rebuilt settings when settings are
    /// requested; it is the only way this call changes settings.
    pub async fn restore<R, F>(
        &self,
        source: &mut R,
        options: BackupOptions,
        on_settings_restored: F,
    ) -> WardenResult<BackupDocument>
    where
        R: AsyncRead + Unpin + ?Sized,
        F: FnOnce(Settings),
    {
        let result = self
            .restore_with_report(source, options, on_settings_restored)
            .await?;
        Ok(result.document)
    }

    /// Like [`restore`](Self::restore), also returning per-section outcomes
    #[instrument(skip_all)]
    pub async fn restore_with_report<R, F>(
        &self,
        source: &mut R,
        options: BackupOptions,
        on_settings_restored: F,
    ) -> WardenResult<RestoreResult>
    where
        R: AsyncRead + Unpin + ?Sized,
        F: FnOnce(Settings),
    {
        let document = match Self::read_document(source).await {
            Ok(document) => document,
            Err(e) => {
                error!(error = %e, "Failed to import backup");
                return Err(e);
            }
        };

        let mut report = RestoreReport::default();

        report.record(
            Section::Settings,
            restore_settings(&document, options.settings, on_settings_restored),
        );
        report.record(
            Section::Domains,
            self.restore_domains(&document.custom_domains, options.domains)
                .await,
        );
        report.record(
            Section::Blocklists,
            self.restore_blocklists(&document.custom_blocklists, options.blocklists)
                .await,
        );
        report.record(
            Section::Applications,
            self.restore_applications(&document.applications, options.applications)
                .await,
        );

        info!(summary = %report.summary(), "Backup imported successfully");
        Ok(RestoreResult { document, report })
    }

    async fn restore_domains(
        &self,
        records: &[CustomDomainBackup],
        requested: bool,
    ) -> SectionOutcome {
        if !requested {
            return SectionOutcome::NotRequested;
        }
        if records.is_empty() {
            return SectionOutcome::Empty;
        }

        let mut applied = 0;
        let mut failed = 0;
        for record in records {
            match self.collaborators.domains.insert(record.to_domain()).await {
                Ok(()) => applied += 1,
                Err(e) => {
                    failed += 1;
                    warn!(domain = %record.domain, error = %e, "Failed to restore domain");
                }
            }
        }

        SectionOutcome::Applied {
            applied,
            skipped: 0,
            failed,
        }
    }

    async fn restore_blocklists(
        &self,
        records: &[CustomBlocklistBackup],
        requested: bool,
    ) -> SectionOutcome {
        if !requested {
            return SectionOutcome::NotRequested;
        }
        if records.is_empty() {
            return SectionOutcome::Empty;
        }

        let store = &self.collaborators.blocklists;
        let mut configuration = match store.load().await {
            Ok(configuration) => configuration,
            Err(e) => {
                error!(error = %e, "Failed to load blocklist configuration");
                return SectionOutcome::Failed(e.to_string());
            }
        };

        let merge = merge_blocklists(&mut configuration, records);
        if merge.skipped > 0 {
            debug!(skipped = merge.skipped, "already subscribed, keeping live entries");
        }

        // One save for the whole section
        if let Err(e) = store.save(&configuration).await {
            error!(error = %e, "Failed to save restored blocklists");
            return SectionOutcome::Failed(e.to_string());
        }

        SectionOutcome::Applied {
            applied: merge.added,
            skipped: merge.skipped,
            failed: 0,
        }
    }

    async fn restore_applications(
        &self,
        records: &[ApplicationBackup],
        requested: bool,
    ) -> SectionOutcome {
        if !requested {
            return SectionOutcome::NotRequested;
        }
        if records.is_empty() {
            return SectionOutcome::Empty;
        }

        let registry = &self.collaborators.applications;
        let installed = match registry.list_applications().await {
            Ok(installed) => installed,
            Err(e) => {
                error!(error = %e, "Failed to restore application rules");
                return SectionOutcome::Failed(e.to_string());
            }
        };
        let index = InstalledIndex::new(&installed);

        let mut applied = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for record in records {
            let Some(app) = index.find(record) else {
                debug!(package = %record.package_id, "not installed, skipping");
                skipped += 1;
                continue;
            };

            match registry.update(apply_policy(app, record)).await {
                Ok(()) => applied += 1,
                Err(e) => {
                    failed += 1;
                    warn!(package = %record.package_id, error = %e, "Failed to restore application rule");
                }
            }
        }

        SectionOutcome::Applied {
            applied,
            skipped,
            failed,
        }
    }
}

fn restore_settings<F>(document: &BackupDocument, requested: bool, callback: F) -> SectionOutcome
where
    F: FnOnce(Settings),
{
    if !requested {
        return SectionOutcome::NotRequested;
    }

    callback(document.settings.to_settings());
    SectionOutcome::Applied {
        applied: 1,
        skipped: 0,
        failed: 0,
    }
}

/// What a backup contains, read without restoring it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInspection {
    pub version: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub allowlist_domains: usize,
    pub blocklist_domains: usize,
    pub blocklists: usize,
    pub applications: usize,
}

impl BackupInspection {
    pub fn is_newer_than_supported(&self) -> bool {
        self.version > BACKUP_SCHEMA_VERSION
    }

    /// Get a summary of what the backup holds
    pub fn summary(&self) -> String {
        let created = self
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown date".to_string());

        format!(
            "Backup v{} from {}: {} allowlisted and {} blocked domains, {} blocklists, {} application rules",
            self.version,
            created,
            self.allowlist_domains,
            self.blocklist_domains,
            self.blocklists,
            self.applications
        )
    }
}

impl From<&BackupDocument> for BackupInspection {
    fn from(document: &BackupDocument) -> Self {
        let allowlist_domains = document
            .custom_domains
            .iter()
            .filter(|d| d.is_allowlist)
            .count();

        Self {
            version: document.version,
            created_at: Utc.timestamp_millis_opt(document.timestamp).single(),
            allowlist_domains,
            blocklist_domains: document.custom_domains.len() - allowlist_domains,
            blocklists: document.custom_blocklists.len(),
            applications: document.applications.len(),
        }
    }
}
