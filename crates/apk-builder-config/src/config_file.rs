//! Config file discovery
//!
//! The first existing file wins, in this order:
//! 1. `$APK_BUILDER_CONFIG`
//! 2. `.apk-builder.toml` in the current directory
//! 3. `.apk-builder.toml` in the home directory
//! 4. `apk-builder/config.toml` in the platform config directory

use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".apk-builder.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "APK_BUILDER_CONFIG";

/// A config file that was found and read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Locations searched for a config file, most specific first
fn candidate_paths(
    explicit: Option<PathBuf>,
    home: Option<&Path>,
    config_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = explicit.into_iter().collect();
    paths.push(PathBuf::from(CONFIG_FILE));
    paths.extend(home.map(|home| home.join(CONFIG_FILE)));
    paths.extend(config_dir.map(|dir| dir.join("apk-builder").join("config.toml")));
    paths
}

fn first_readable(paths: &[PathBuf]) -> Option<ConfigSource> {
    paths.iter().find_map(|path| {
        std::fs::read_to_string(path)
            .ok()
            .map(|content| ConfigSource {
                path: path.clone(),
                content,
            })
    })
}

/// Find and read the config file
///
/// Returns `None` when no candidate exists; the caller falls back to defaults.
pub fn load_config_file() -> Option<ConfigSource> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let paths = candidate_paths(
        explicit,
        dirs::home_dir().as_deref(),
        dirs::config_dir().as_deref(),
    );
    let source = first_readable(&paths);
    match &source {
        Some(source) => log::debug!("Loaded config from {}", source.path.display()),
        None => log::debug!("No config file found in {:?}", paths),
    }
    source
}
