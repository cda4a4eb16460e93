//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print a single value
//! - `config set`: Set a configuration value

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::print_json;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;

    if json {
        return print_json(&json!({
            "base_url": config.base_url(),
            "request_timeout": config.request_timeout,
            "notice_ttl": config.notice_ttl,
            "config_file": path.to_string_lossy(),
        }));
    }

    println!(
        "{}\n",
        "Configuration:".if_supports_color(Stream::Stdout, |t| t.cyan())
    );
    for key in CONFIG_KEYS {
        println!(
            "  {}: {}",
            key.if_supports_color(Stream::Stdout, |t| t.cyan()),
            config.get(key)?
        );
    }
    println!(
        "\n{} {}",
        "config file:".if_supports_color(Stream::Stdout, |t| t.dimmed()),
        path.display()
    );
    Ok(())
}

/// Print one configuration value
pub fn cmd_config_get(key: &str) -> Result<()> {
    let config = Config::load()?;
    println!("{}", config.get(key)?);
    Ok(())
}

/// Set and save one configuration value
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    println!("Set {key} = {}", config.get(key)?);
    Ok(())
}
