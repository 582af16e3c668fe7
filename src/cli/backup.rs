//! Backup CLI commands
//!
//! Implements the export, import, inspect and list commands.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::backup::{
    BackupArchive, BackupExporter, BackupOptions, BackupRestorer, RestoreReport, Section,
    SectionOutcome,
};
use crate::config::paths::WardenPaths;
use crate::config::settings::Settings;
use crate::error::{WardenError, WardenResult};
use crate::storage::Storage;

/// Flags that leave a section out of an export or import
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SectionFlags {
    /// Leave out the settings snapshot
    #[arg(long)]
    pub no_settings: bool,

    /// Leave out custom allowlist/blocklist domains
    #[arg(long)]
    pub no_domains: bool,

    /// Leave out blocklist subscriptions
    #[arg(long)]
    pub no_blocklists: bool,

    /// Leave out per-application network rules
    #[arg(long)]
    pub no_applications: bool,
}

impl SectionFlags {
    pub fn options(&self) -> BackupOptions {
        BackupOptions::all()
            .with(Section::Settings, !self.no_settings)
            .with(Section::Domains, !self.no_domains)
            .with(Section::Blocklists, !self.no_blocklists)
            .with(Section::Applications, !self.no_applications)
    }
}

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Export the current configuration to a backup file
    Export {
        /// Output file (defaults to a dated file in the backup directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        sections: SectionFlags,
    },

    /// Restore configuration from a backup file
    Import {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        #[command(flatten)]
        sections: SectionFlags,
    },

    /// Show what a backup file contains without restoring it
    Inspect {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,
    },

    /// List backups in the backup directory
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },
}

impl BackupCommands {
    /// Name used when reporting a failure of this command
    pub fn action(&self) -> &'static str {
        match self {
            Self::Export { .. } => "Export",
            Self::Import { .. } => "Import",
            Self::Inspect { .. } => "Inspect",
            Self::List { .. } => "List",
        }
    }
}

/// Handle a backup command
pub async fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> WardenResult<()> {
    let archive = BackupArchive::new(storage.paths());

    match cmd {
        BackupCommands::Export { output, sections } => {
            let options = sections.options();
            let exporter = BackupExporter::new(storage.collaborators());

            let path = match output {
                Some(path) => {
                    BackupArchive::export_to_file(&exporter, &path, settings, options).await?;
                    path
                }
                None => archive.create_backup(&exporter, settings, options).await?,
            };

            println!("Backup exported: {}", path.display());
        }

        BackupCommands::Import { backup, sections } => {
            let path = resolve_backup_path(&archive, &backup).await?;
            let mut file = open_backup(&path).await?;

            let mut restored_settings = None;
            let restorer = BackupRestorer::new(storage.collaborators());
            let mut result = restorer
                .restore_with_report(&mut file, sections.options(), |s| {
                    restored_settings = Some(s)
                })
                .await?;

            persist_restored_settings(storage.paths(), restored_settings, &mut result.report);

            println!("Imported {}", path.display());
            println!("{}", result.report.summary());

            for (section, outcome) in result.report.steps() {
                if let SectionOutcome::Failed(reason) = outcome {
                    println!("  {} could not be restored: {}", section, reason);
                }
            }
            if result.document.is_newer_than_supported() {
                println!("Note: the backup was written by a newer version; unknown fields were ignored.");
            }
        }

        BackupCommands::Inspect { backup } => {
            let path = resolve_backup_path(&archive, &backup).await?;
            let mut file = open_backup(&path).await?;
            let inspection = BackupRestorer::inspect(&mut file).await?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", path.display());
            println!("{}", inspection.summary());
            if inspection.is_newer_than_supported() {
                println!("Note: written by a newer version of warden");
            }
        }

        BackupCommands::List { verbose } => {
            let backups = archive.list_backups().await?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: warden export");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        format_duration(age),
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }
    }

    Ok(())
}

/// Write restored settings to config.json; a write failure fails only the
/// settings section of the report
fn persist_restored_settings(
    paths: &WardenPaths,
    restored: Option<Settings>,
    report: &mut RestoreReport,
) {
    let Some(restored) = restored else {
        return;
    };

    if let Err(e) = restored.save(paths) {
        warn!(error = %e, "restored settings could not be saved");
        report.record_failure(Section::Settings, e.to_string());
    }
}

async fn open_backup(path: &Path) -> WardenResult<tokio::fs::File> {
    tokio::fs::File::open(path)
        .await
        .map_err(|e| WardenError::Io(format!("Failed to open {}: {}", path.display(), e)))
}

/// Resolve a backup identifier to a full path
async fn resolve_backup_path(archive: &BackupArchive, backup: &str) -> WardenResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return archive
            .latest_backup()
            .await?
            .map(|b| b.path)
            .ok_or_else(|| WardenError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    // A bare filename in the backup directory
    let in_archive = archive.backup_dir().join(backup);
    if in_archive.exists() {
        return Ok(in_archive);
    }

    Err(WardenError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_flags() {
        assert_eq!(SectionFlags::default().options(), BackupOptions::all());

        let flags = SectionFlags {
            no_domains: true,
            no_applications: true,
            ..Default::default()
        };
        let options = flags.options();
        assert!(options.settings);
        assert!(!options.domains);
        assert!(options.blocklists);
        assert!(!options.applications);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::minutes(5)), "5m");
        assert_eq!(format_duration(chrono::Duration::hours(3)), "3h");
        assert_eq!(format_duration(chrono::Duration::days(4)), "4d");
        assert_eq!(format_duration(chrono::Duration::days(65)), "2mo");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    fn settings_applied() -> RestoreReport {
        let mut report = RestoreReport::default();
        report.record(
            Section::Settings,
            SectionOutcome::Applied {
                applied: 1,
                skipped: 0,
                failed: 0,
            },
        );
        report.record(Section::Domains, SectionOutcome::Empty);
        report
    }

    #[test]
    fn test_persist_restored_settings() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = WardenPaths::with_base_dir(temp_dir.path().to_path_buf());
        let restored = Settings {
            dark_theme: true,
            ..Default::default()
        };

        let mut report = settings_applied();
        persist_restored_settings(&paths, Some(restored), &mut report);

        assert!(report.is_clean());
        let saved = Settings::load_or_create(&paths).unwrap();
        assert!(saved.dark_theme);
    }

    #[test]
    fn test_settings_write_failure_fails_only_settings_section() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = WardenPaths::with_base_dir(temp_dir.path().to_path_buf());
        // A directory where the settings file should go makes the write fail
        std::fs::create_dir_all(paths.settings_file()).unwrap();

        let mut report = settings_applied();
        persist_restored_settings(&paths, Some(Settings::default()), &mut report);

        assert!(report.outcome(Section::Settings).unwrap().is_failed());
        assert_eq!(report.outcome(Section::Domains), Some(&SectionOutcome::Empty));
        assert!(report.summary().starts_with("Restored settings: failed ("));
    }

    #[test]
    fn test_nothing_to_persist_leaves_report() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = WardenPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut report = settings_applied();
        persist_restored_settings(&paths, None, &mut report);

        assert_eq!(report, settings_applied());
        assert!(!paths.settings_file().exists());
    }

    #[tokio::test]
    async fn test_resolve_missing_backup() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let archive = BackupArchive::with_dir(temp_dir.path().to_path_buf());

        let err = resolve_backup_path(&archive, "latest").await.unwrap_err();
        assert!(err.is_not_found());
        let err = resolve_backup_path(&archive, "nope.json").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
