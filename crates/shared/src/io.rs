use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default directory for saved reading lists
pub fn get_default_reads_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join("big-picture-reads");

    fs::create_dir_all(&data_dir).context("Failed to create reads directory")?;

    Ok(data_dir)
}

pub fn reads_filename(now: DateTime<Local>) -> String {
    format!("reads-{}.json", now.format("%Y-%m-%d-%H%M%S"))
}

/// Save a serialized reading list into `dir`
pub fn save_payload(payload: &str, dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    let filepath = dir.join(reads_filename(now));

    fs::write(&filepath, payload)
        .with_context(|| format!("Failed to write reading list: {}", filepath.display()))?;

    Ok(filepath)
}
