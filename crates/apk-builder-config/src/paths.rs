//! Cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.cache/apk-builder/`
//! - macOS: `~/Library/Caches/apk-builder/`
//! - Windows: `%LOCALAPPDATA%\apk-builder\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "apk-builder";

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    Ok(dir)
}

/// Path of a log file inside the cache directory
pub fn log_file_path(file_name: &str) -> Result<PathBuf> {
    Ok(cache_dir()?.join(file_name))
}
