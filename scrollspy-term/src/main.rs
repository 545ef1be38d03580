mod app;
mod config;
mod document;
mod error;
mod loader;
mod terminal;
mod view;

use std::fs::File;

use log::info;
use simplelog::{Config, WriteLogger};

use crate::config::AppConfig;
use crate::error::AppError;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    // The terminal owns stdout, so logs go to a file.
    let log_file = File::create(&config.log_file)?;
    WriteLogger::init(config.log_level, Config::default(), log_file)?;
    info!("Starting with {:?}", config);

    app::run(config).await
}
