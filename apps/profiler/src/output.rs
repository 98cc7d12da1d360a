use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

/// Writes `value` as pretty JSON to `path`, creating parent directories.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize JSON: {e}")))?;
    tokio::fs::write(path, text).await?;

    info!("Wrote {}", path.display());
    Ok(())
}

/// Writes a local copy of a result as `<dir>/<id>_<suffix>.json`.
pub async fn write_backup<T: Serialize>(
    dir: &Path,
    id: &str,
    suffix: &str,
    value: &T,
) -> Result<PathBuf, AppError> {
    let path = dir.join(format!("{id}_{suffix}.json"));
    write_json(&path, value).await?;
    Ok(path)
}
