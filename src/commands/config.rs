//! Configuration commands.
//!
//! - `config show`: Display the stored configuration and the effective API base
//! - `config set`: Set a configuration value
//! - `config get`: Print a single configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{ApiSettings, Config};
use crate::error::{DeskError, Result};

/// Show current configuration.
///
/// `api_base` is the `--api-base` override, if any, so the effective URL
/// matches what a remote command would use.
pub fn cmd_config_show(api_base: Option<&str>, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let settings = ApiSettings::from_env(api_base, &config)?;

    let json_output = json!({
        "api": {
            "base_url": config.api.base_url,
            "connect_timeout_secs": config.api.connect_timeout_secs,
        },
        "effective": {
            "base_url": settings.base_url.as_str(),
            "source": settings.source.to_string(),
            "connect_timeout_secs": settings.connect_timeout.as_secs(),
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let not_configured = || "not configured".dimmed().to_string();

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}:\n", "api".cyan()));
    text_output.push_str(&format!(
        "  base_url: {}\n",
        config
            .api
            .base_url
            .clone()
            .unwrap_or_else(not_configured)
    ));
    text_output.push_str(&format!(
        "  connect_timeout_secs: {}\n",
        config
            .api
            .connect_timeout_secs
            .map(|s| s.to_string())
            .unwrap_or_else(not_configured)
    ));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}: {} ({})\n",
        "Effective API base".cyan(),
        settings.base_url,
        settings.source
    ));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    tracing::debug!(key, "saved config value");

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), value))
    .print(output_json)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let Some(value) = config.get(key)? else {
        return Err(DeskError::Config(format!("{key} not set")));
    };

    CommandOutput::new(json!({
        "key": key,
        "value": value,
        "configured": true,
    }))
    .with_text(value)
    .print(output_json)
}
