use anyhow::{Context, Result};
use apk_builder_config::AppConfig;

mod actions;
mod app;
mod console;
mod dispatcher;
mod domain_models;
mod logger;
mod middleware;
mod prompt;
mod reducers;
mod services;
mod state;
mod store;
mod workflow_template;

#[cfg(test)]
mod testing;

use services::Services;

fn main() -> Result<()> {
    let log_file = logger::init()?;

    log::info!("Starting apk-builder");
    console::log_location(&log_file);

    let config = AppConfig::load();
    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let result = runtime.block_on(app::run(Services::from_config(config)));
    if let Err(err) = &result {
        log::error!("Session ended with error: {:#}", err);
    }

    log::info!("Exiting apk-builder");
    result
}
