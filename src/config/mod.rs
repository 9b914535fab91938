mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from `CONFIG_PATH` (default `config.yaml`).
///
/// A missing default file is not an error: built-in defaults apply. An
/// explicitly named file must exist.
pub async fn load() -> Result<Config> {
    let explicit = env::var("CONFIG_PATH").ok();
    let config_path = explicit
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if explicit.is_none() && !Path::new(&config_path).exists() {
        debug!("No {} found, using built-in defaults", config_path);
        Config::default()
    } else {
        debug!("Loading configuration from: {}", config_path);
        let config_str = tokio::fs::read_to_string(&config_path).await?;
        parse(&config_str)?
    };

    if let Ok(dir) = env::var("SCRATCH_DIR") {
        config.conversion.scratch_dir = Some(dir.into());
    }

    Ok(config)
}

pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let tool = &config.conversion.document_tool;
    if tool.command.trim().is_empty() {
        return Err(Error::config("conversion.document_tool.command must not be empty"));
    }
    if tool.timeout_secs == 0 {
        return Err(Error::config(
            "conversion.document_tool.timeout_secs must be greater than zero",
        ));
    }
    if config.server.max_upload_bytes == 0 {
        return Err(Error::config("server.max_upload_bytes must be greater than zero"));
    }
    Ok(())
}
