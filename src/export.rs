//! JSON export of fetched data for scripting.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Write `value` as pretty JSON to `path`, creating parent directories as needed.
pub fn export_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("serialize export")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
