//! File-based logging using simplelog
//!
//! Debug builds write `apk-builder-<timestamp>.log` to the working
//! directory, release builds to the cache directory. The console belongs
//! to build progress, so nothing is logged there.

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

/// HTTP plumbing that floods debug logs with connection chatter
const QUIET_TARGETS: [&str; 3] = ["hyper", "reqwest", "rustls"];

fn log_file_path() -> PathBuf {
    let filename = format!(
        "apk-builder-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );

    if cfg!(debug_assertions) {
        return PathBuf::from(filename);
    }
    apk_builder_config::paths::log_file_path(&filename).unwrap_or_else(|err| {
        eprintln!("⚠️  No cache directory ({err:#}), logging to the working directory");
        PathBuf::from(filename)
    })
}

/// Level from `RUST_LOG`; unset means debug, unparsable means info
fn parse_level(value: Option<&str>) -> LevelFilter {
    match value {
        None => LevelFilter::Debug,
        Some(value) => LevelFilter::from_str(value.trim()).unwrap_or(LevelFilter::Info),
    }
}

/// Install the file logger and return where it writes
pub fn init() -> Result<PathBuf> {
    let log_file = log_file_path();
    let level = parse_level(std::env::var("RUST_LOG").ok().as_deref());

    let mut builder = ConfigBuilder::new();
    builder.set_time_format_rfc3339();
    // UTC when the local offset cannot be determined
    let _ = builder.set_time_offset_to_local();
    for target in QUIET_TARGETS {
        builder.add_filter_ignore_str(target);
    }

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    WriteLogger::init(level, builder.build(), file).context("Failed to initialize logger")?;

    log::info!("apk-builder {} logging at {}", env!("CARGO_PKG_VERSION"), level);
    Ok(log_file)
}
