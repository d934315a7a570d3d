//! student-success entrypoint: loads config, installs logging, dispatches the
//! requested screen.

mod cli;

use clap::Parser;
use student_success::{config::AppConfig, logging::StructuredLogger};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = cli::Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load(&config_path);
    cli.apply_overrides(&mut config);

    if let Err(e) = StructuredLogger::init(config.log.json, &config.log.level) {
        eprintln!("logging not installed: {e}");
    }
    info!(config = %config_path.display(), "student-success starting");

    cli::run(cli, &config)
}
