use crate::domain::models::HistoryEntry;
use crate::services::config::config_dir;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn history_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("history.jsonl"))
}

/// Append one action to the local history. Never fails the caller.
pub fn record(action: &str, data: serde_json::Value) {
    let path = match history_path() {
        Ok(p) => p,
        Err(_) => return,
    };
    if let Err(e) = append_to(&path, action, data) {
        debug!(error = %e, "could not write history");
    }
}

fn append_to(path: &Path, action: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let entry = HistoryEntry {
        ts: chrono::Utc::now().to_rfc3339(),
        action: action.to_string(),
        data,
    };
    let line = format!("{}\n", serde_json::to_string(&entry)?);
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?
        .write_all(line.as_bytes())?;
    Ok(())
}

/// Most recent entries first. Lines that do not parse are skipped.
pub fn read_from(path: &Path, limit: usize) -> anyhow::Result<Vec<HistoryEntry>> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .rev()
        .filter_map(|l| serde_json::from_str::<HistoryEntry>(l).ok())
        .take(limit)
        .collect())
}

pub fn recent(limit: usize) -> anyhow::Result<Vec<HistoryEntry>> {
    read_from(&history_path()?, limit)
}
