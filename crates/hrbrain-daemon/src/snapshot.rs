//! Agent snapshot persistence
//!
//! The RL core deliberately has no persistence of its own; the daemon
//! serializes the full table, pair tracker, and history as JSON at
//! shutdown (or on demand) and reloads it at startup.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use hrbrain_rl::AgentSnapshot;

/// Write a snapshot atomically: temp file in the same directory, then
/// rename over the target.
pub fn save(path: impl AsRef<Path>, snapshot: &AgentSnapshot) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_vec_pretty(snapshot).context("Failed to serialize snapshot")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    info!(path = %path.display(), "agent snapshot saved");
    Ok(())
}

/// Load a snapshot if the file exists; `Ok(None)` when it does not.
pub fn load(path: impl AsRef<Path>) -> Result<Option<AgentSnapshot>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot: AgentSnapshot =
        serde_json::from_slice(&bytes).context("Failed to parse snapshot")?;

    info!(
        path = %path.display(),
        events = snapshot.history.len(),
        "agent snapshot loaded"
    );
    Ok(Some(snapshot))
}
