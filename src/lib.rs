mod cli;
mod commands;
mod config;
mod error;
mod logger;
mod utils;

use clap::Parser;

pub use cli::{Cli, Command};
pub use config::{Config, ConfigError};
pub use error::AppError;
pub use logger::{LogFormat, LoggerConfig};
pub use utils::measure_runtime;

/// Parse the command line, load configuration, install the logger and run
/// the selected command.
pub async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = config::load_configuration(cli.config.as_deref())?;
    logger::initialize(&config.logger);

    tracing::debug!(command = ?cli.command, "Configuration loaded");

    commands::execute(cli.command, &config).await
}
