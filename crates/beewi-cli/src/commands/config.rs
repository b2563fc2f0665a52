//! Config command implementation.

use anyhow::{Context, Result};

use crate::cli::{ConfigAction, ConfigKey, parse_bool_arg};
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, quiet: bool) -> Result<()> {
    let mut config = Config::load();

    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            if content.trim().is_empty() {
                if !quiet {
                    println!("No configuration set.");
                }
            } else {
                print!("{}", content);
            }
        }
        ConfigAction::Get { key } => match get_value(&config, key) {
            Some(value) => println!("{}", value),
            None if !quiet => eprintln!("{} is not set", key_name(key)),
            None => {}
        },
        ConfigAction::Set { key, value } => {
            set_value(&mut config, key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key_name(key), value);
            }
        }
        ConfigAction::Unset { key } => {
            unset_value(&mut config, key);
            config.save()?;
            if !quiet {
                println!("Unset {}", key_name(key));
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::path().display());
        }
    }

    Ok(())
}

fn key_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::Device => "device",
        ConfigKey::Timeout => "timeout",
        ConfigKey::NoColor => "no_color",
    }
}

fn get_value(config: &Config, key: ConfigKey) -> Option<String> {
    match key {
        ConfigKey::Device => config.device.clone(),
        ConfigKey::Timeout => config.timeout.map(|t| t.to_string()),
        ConfigKey::NoColor => Some(config.no_color.to_string()),
    }
}

fn set_value(config: &mut Config, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::Device => config.device = Some(value.to_string()),
        ConfigKey::Timeout => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("Invalid timeout '{}': expected seconds", value))?;
            if secs == 0 {
                anyhow::bail!("Timeout must be at least 1 second");
            }
            config.timeout = Some(secs);
        }
        ConfigKey::NoColor => {
            config.no_color = parse_bool_arg(value).map_err(anyhow::Error::msg)?;
        }
    }
    Ok(())
}

fn unset_value(config: &mut Config, key: ConfigKey) {
    match key {
        ConfigKey::Device => config.device = None,
        ConfigKey::Timeout => config.timeout = None,
        ConfigKey::NoColor => config.no_color = false,
    }
}
