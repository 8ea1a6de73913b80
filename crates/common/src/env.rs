//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data file location is usable at startup.
//! Whether the file itself exists is reported by the store when it loads.

use std::path::Path;

use tracing::info;

/// Ensure the parent directory of `data_file` exists.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        info!(dir = %parent.display(), "data directory ready");
    }
    Ok(())
}
