//! Settings for the `tally` binary.
//!
//! Layered lowest to highest: built-in defaults, the optional TOML file
//! (`config/tally.toml` or `--config`), `TALLY_*` environment variables and
//! finally command-line overrides.

use serde::Deserialize;

use crate::{cli::Cli, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/tally.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    /// Recent transactions shown by `summary`.
    pub recent_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./tally.db?mode=rwc".to_string(),
            log_level: "info".to_string(),
            recent_limit: 5,
        }
    }
}

pub fn load(cli: &Cli) -> Result<AppConfig> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TALLY"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(database_url) = &cli.database_url {
        settings.database_url.clone_from(database_url);
    }
    if let Some(log_level) = &cli.log_level {
        settings.log_level.clone_from(log_level);
    }

    Ok(settings)
}
