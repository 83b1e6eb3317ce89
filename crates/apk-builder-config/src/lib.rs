//! Configuration and file management for apk-builder
//!
//! This crate provides:
//! - File path utilities for cache files (logs)
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::{AppConfig, SecretsMode};
pub use config_file::{load_config_file, ConfigSource};
pub use paths::cache_dir;
