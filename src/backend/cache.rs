use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::Snapshot;

/// Configuration for the offline snapshot cache
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
}

/// Get the platform-appropriate cache directory for will-win
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("will-win/snapshots"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/will-win/snapshots",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the snapshot cache directory
pub fn clear_cache() -> Result<()> {
    clear_cache_at(&get_cache_path())
}

pub fn clear_cache_at(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

fn snapshot_key(show_id: &str) -> String {
    format!("snapshot:{}", show_id)
}

/// Persist the last good snapshot for a show
pub fn store_snapshot(cache_path: &Path, snapshot: &Snapshot) -> Result<()> {
    let serialized = serde_json::to_vec(snapshot).context("Failed to serialize snapshot")?;
    cacache::write_sync(cache_path, snapshot_key(&snapshot.show_id), serialized)
        .context("Failed to write snapshot cache")?;
    debug!(show = %snapshot.show_id, "snapshot cached");
    Ok(())
}

/// Load the last good snapshot for a show, if one was cached and still parses
pub fn load_snapshot(cache_path: &Path, show_id: &str) -> Option<Snapshot> {
    let bytes = cacache::read_sync(cache_path, snapshot_key(show_id)).ok()?;
    serde_json::from_slice(&bytes).ok()
}
