//! File I/O utilities with atomic writes
//!
//! Provides safe async file operations that won't corrupt data on failure.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::WardenError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub async fn read_json<T, P>(path: P) -> Result<T, WardenError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
            WardenError::Storage(format!("Failed to parse {}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(WardenError::Storage(format!(
            "Failed to open {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub async fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), WardenError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            WardenError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let json = serde_json::to_vec_pretty(data)
        .map_err(|e| WardenError::Storage(format!("Failed to serialize data: {}", e)))?;

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| WardenError::Storage(format!("Failed to create temp file: {}", e)))?;

    file.write_all(&json)
        .await
        .map_err(|e| WardenError::Storage(format!("Failed to write data: {}", e)))?;

    file.sync_all()
        .await
        .map_err(|e| WardenError::Storage(format!("Failed to sync data: {}", e)))?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(WardenError::Storage(format!(
            "Failed to rename temp file: {}",
            e
        )));
    }

    Ok(())
}
