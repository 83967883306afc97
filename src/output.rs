//! Snapshot persistence: one pretty-printed JSON document per run.

use crate::config::OutputConfig;
use crate::store::Snapshot;
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Write the snapshot as JSON into the configured directory.
///
/// The directory is created on demand. Without a configured filename the
/// document is written as `processos_eproc_<YYYYMMDD_HHMMSS>.json`.
/// Returns the written path.
pub fn write_snapshot(output: &OutputConfig, snapshot: &Snapshot) -> Result<PathBuf> {
    let dir = PathBuf::from(&output.dir);
    std::fs::create_dir_all(&dir)
        .map_err(|e| Error::Persistence(format!("create {}: {}", dir.display(), e)))?;

    let file = match &output.file {
        Some(file) => file.clone(),
        None => format!(
            "processos_eproc_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ),
    };
    let path = dir.join(file);

    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| Error::Persistence(format!("serialize snapshot: {}", e)))?;
    std::fs::write(&path, json)
        .map_err(|e| Error::Persistence(format!("write {}: {}", path.display(), e)))?;

    info!("Snapshot written to: {}", path.display());
    Ok(path)
}
