//! Backup and restore of the live firewall configuration
//!
//! A backup is a single JSON document holding the settings snapshot, custom
//! domain rules, blocklist subscriptions and per-application network policy.
//!
//! # Architecture
//!
//! - `BackupExporter`: reads the live stores and writes a document to a sink.
//!   All or nothing.
//! - `BackupRestorer`: parses a document and merges the requested sections
//!   back into the live stores. Best effort per section, see `RestoreReport`.
//! - `BackupArchive`: backup files in the backup directory.
//!
//! The stores are reached only through the traits in [`traits`], so the
//! engines run the same against the JSON file stores and in-memory fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use warden::backup::{BackupExporter, BackupOptions, BackupRestorer};
//!
//! let collaborators = storage.collaborators();
//! let mut bytes = Vec::new();
//! BackupExporter::new(collaborators.clone())
//!     .export(&mut bytes, &settings, BackupOptions::all())
//!     .await?;
//!
//! let document = BackupRestorer::new(collaborators)
//!     .restore(&mut bytes.as_slice(), BackupOptions::all(), |s| restored = Some(s))
//!     .await?;
//! ```

pub mod archive;
pub mod document;
pub mod export;
pub mod options;
pub mod reconcile;
pub mod report;
pub mod restore;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use archive::{BackupArchive, BackupInfo};
pub use document::{
    ApplicationBackup, BackupDocument, CustomBlocklistBackup, CustomDomainBackup, SettingsBackup,
    BACKUP_SCHEMA_VERSION,
};
pub use export::BackupExporter;
pub use options::{BackupOptions, Section};
pub use report::{RestoreReport, SectionOutcome};
pub use restore::{BackupInspection, BackupRestorer, RestoreResult};
pub use traits::{ApplicationRegistry, BlocklistStore, Collaborators, DomainRepository};
