//! Backup files on disk
//!
//! Backups written without an explicit path land in the backup directory as
//! `warden-backup-YYYYMMDD-HHMMSS-mmm.json`, which is also how they are
//! found and dated again when listing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::config::paths::WardenPaths;
use crate::config::settings::Settings;
use crate::error::{WardenError, WardenResult};

use super::export::BackupExporter;
use super::options::BackupOptions;

const FILENAME_PREFIX: &str = "warden-backup-";

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created, taken from the filename
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Manages the backup directory
pub struct BackupArchive {
    backup_dir: PathBuf,
}

impl BackupArchive {
    pub fn new(paths: &WardenPaths) -> Self {
        Self::with_dir(paths.backup_dir())
    }

    pub fn with_dir(backup_dir: PathBuf) -> Self {
        Self { backup_dir }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Filename for a backup taken at `now`
    pub fn default_filename(now: DateTime<Utc>) -> String {
        format!(
            "{}{}-{:03}.json",
            FILENAME_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        )
    }

    /// Export a backup to `path`
    ///
    /// The document is written to a sibling `.tmp` file and renamed over
    /// `path` once complete. On failure only the temp file is removed, so a
    /// file already at `path` is left as it was.
    pub async fn export_to_file(
        exporter: &BackupExporter,
        path: &Path,
        settings: &Settings,
        options: BackupOptions,
    ) -> WardenResult<()> {
        let temp_path = temp_path_for(path)?;

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            WardenError::Io(format!("Failed to create {}: {}", temp_path.display(), e))
        })?;

        let result = match exporter.export(&mut file, settings, options).await {
            Ok(()) => file
                .sync_all()
                .await
                .map_err(|e| WardenError::Io(format!("Failed to sync backup file: {}", e))),
            Err(e) => Err(e),
        };
        drop(file);

        let result = match result {
            Ok(()) => fs::rename(&temp_path, path).await.map_err(|e| {
                WardenError::Io(format!("Failed to move backup to {}: {}", path.display(), e))
            }),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            if let Err(remove_err) = fs::remove_file(&temp_path).await {
                warn!(path = %temp_path.display(), error = %remove_err, "Failed to remove partial backup");
            }
            return Err(e);
        }

        Ok(())
    }

    /// Export a backup into the backup directory
    ///
    /// Returns the path to the created backup file.
    pub async fn create_backup(
        &self,
        exporter: &BackupExporter,
        settings: &Settings,
        options: BackupOptions,
    ) -> WardenResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).await.map_err(|e| {
            WardenError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let path = self.backup_dir.join(Self::default_filename(Utc::now()));
        Self::export_to_file(exporter, &path, settings, options).await?;

        info!(path = %path.display(), "Backup created");
        Ok(path)
    }

    /// List all backups in the backup directory, newest first
    pub async fn list_backups(&self) -> WardenResult<Vec<BackupInfo>> {
        if !fs::try_exists(&self.backup_dir).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.backup_dir).await.map_err(|e| {
            WardenError::Io(format!("Failed to read backup directory: {}", e))
        })?;

        let mut backups = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            WardenError::Io(format!("Failed to read directory entry: {}", e))
        })? {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path).await {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Get the most recent backup
    pub async fn latest_backup(&self) -> WardenResult<Option<BackupInfo>> {
        Ok(self.list_backups().await?.into_iter().next())
    }
}

/// `backup.json` -> `backup.json.tmp`, in the same directory
fn temp_path_for(path: &Path) -> WardenResult<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| WardenError::Io(format!("Not a file path: {}", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

async fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename
        .strip_prefix(FILENAME_PREFIX)?
        .strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).await.ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS` with an optional `-mmm` millisecond suffix
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let (date_part, time_part) = (parts[0], parts[1]);
    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }
    let millis: u32 = match parts.get(2) {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };

    let date = NaiveDate::from_ymd_opt(
        date_part[0..4].parse().ok()?,
        date_part[4..6].parse().ok()?,
        date_part[6..8].parse().ok()?,
    )?;
    let time = NaiveTime::from_hms_milli_opt(
        time_part[0..2].parse().ok()?,
        time_part[2..4].parse().ok()?,
        time_part[4..6].parse().ok()?,
        millis,
    )?;

    Some(NaiveDateTime::new(date, time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::document::BackupDocument;
    use crate::backup::testing::{Fixture, MemoryApplications, MemoryBlocklists, MemoryDomains};
    use chrono::{Datelike, TimeZone, Timelike};
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_archive() -> (BackupArchive, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WardenPaths::with_base_dir(temp_dir.path().to_path_buf());
        (BackupArchive::new(&paths), temp_dir)
    }

    #[test]
    fn test_default_filename() {
        let now = Utc.with_ymd_and_hms(2025, 11, 27, 14, 30, 22).unwrap()
            + chrono::Duration::milliseconds(45);
        assert_eq!(
            BackupArchive::default_filename(now),
            "warden-backup-20251127-143022-045.json"
        );
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!(timestamp.year(), 2025);
        assert_eq!(timestamp.month(), 11);
        assert_eq!(timestamp.day(), 27);
        assert_eq!(timestamp.hour(), 14);

        let timestamp = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("2025-11-27").is_none());
        assert!(parse_backup_timestamp("20251327-143022").is_none());
    }

    #[tokio::test]
    async fn test_create_and_list_backups() {
        let (archive, _temp) = create_test_archive();
        let fixture = Fixture::empty();
        let exporter = BackupExporter::new(fixture.collaborators());

        let first = archive
            .create_backup(&exporter, &Settings::default(), BackupOptions::all())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = archive
            .create_backup(&exporter, &Settings::default(), BackupOptions::all())
            .await
            .unwrap();

        let backups = archive.list_backups().await.unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].path, second);
        assert_eq!(backups[1].path, first);
        assert!(backups[0].size_bytes > 0);

        let latest = archive.latest_backup().await.unwrap().unwrap();
        assert_eq!(latest.path, second);

        let bytes = std::fs::read(&first).unwrap();
        assert!(BackupDocument::from_slice(&bytes).is_ok());
    }

    #[tokio::test]
    async fn test_list_ignores_other_files() {
        let (archive, _temp) = create_test_archive();
        std::fs::create_dir_all(archive.backup_dir()).unwrap();
        std::fs::write(archive.backup_dir().join("notes.json"), "{}").unwrap();
        std::fs::write(archive.backup_dir().join("warden-backup-x.json"), "{}").unwrap();

        assert!(archive.list_backups().await.unwrap().is_empty());
        assert!(archive.latest_backup().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_backup_dir_lists_nothing() {
        let (archive, _temp) = create_test_archive();
        assert!(archive.list_backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_export_removes_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");
        let fixture = Fixture::new(
            MemoryDomains::default(),
            MemoryBlocklists::default(),
            MemoryApplications {
                fail_list: true,
                ..Default::default()
            },
        );
        let exporter = BackupExporter::new(fixture.collaborators());

        let err = BackupArchive::export_to_file(
            &exporter,
            &path,
            &Settings::default(),
            BackupOptions::all(),
        )
        .await
        .unwrap_err();

        assert!(err.is_collaborator());
        assert!(!path.exists());
        assert!(!temp_dir.path().join("backup.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_export_keeps_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");
        std::fs::write(&path, r#"{"previous": "valid backup"}"#).unwrap();

        let fixture = Fixture::new(
            MemoryDomains::default(),
            MemoryBlocklists::default(),
            MemoryApplications {
                fail_list: true,
                ..Default::default()
            },
        );
        let exporter = BackupExporter::new(fixture.collaborators());

        BackupArchive::export_to_file(
            &exporter,
            &path,
            &Settings::default(),
            BackupOptions::all(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"previous": "valid backup"}"#
        );
        assert!(!temp_dir.path().join("backup.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_export_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backup.json");
        std::fs::write(&path, "old").unwrap();

        let fixture = Fixture::empty();
        let exporter = BackupExporter::new(fixture.collaborators());
        BackupArchive::export_to_file(
            &exporter,
            &path,
            &Settings::default(),
            BackupOptions::all(),
        )
        .await
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(BackupDocument::from_slice(&bytes).is_ok());
        assert!(!temp_dir.path().join("backup.json.tmp").exists());
    }

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("/tmp/out.bak")).unwrap(),
            PathBuf::from("/tmp/out.bak.tmp")
        );
    }

    #[tokio::test]
    async fn test_export_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("backup.json");
        let fixture = Fixture::empty();
        let exporter = BackupExporter::new(fixture.collaborators());

        let err = BackupArchive::export_to_file(
            &exporter,
            &path,
            &Settings::default(),
            BackupOptions::all(),
        )
        .await
        .unwrap_err();
        assert!(err.is_io());
    }
}
