//! Configuration file management.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default device address
    #[serde(default)]
    pub device: Option<String>,

    /// Connection timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Device aliases (friendly name -> device address)
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Last successfully connected device (auto-updated)
    #[serde(default)]
    pub last_device: Option<String>,

    /// Name of the last connected device (for display)
    #[serde(default)]
    pub last_device_name: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("beewi")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from an explicit path, or return default if it cannot be read.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Where a resolved device identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSource {
    /// `--device` flag or `BEEWI_DEVICE`.
    Explicit,
    /// An alias given on the command line.
    Alias,
    /// The `device` key in the config file.
    Default,
    /// The last bulb the CLI connected to.
    Last,
}

/// Resolve an alias to its device address, or return the original if not an alias.
pub fn resolve_alias(device: &str, config: &Config) -> String {
    config
        .aliases
        .get(device)
        .cloned()
        .unwrap_or_else(|| device.to_string())
}

/// Resolve the device to use.
///
/// Order: flag/env (after alias lookup), config default, last device.
pub fn resolve_device(device: Option<&str>, config: &Config) -> Option<(String, DeviceSource)> {
    if let Some(d) = device {
        return Some(match config.aliases.get(d) {
            Some(address) => (address.clone(), DeviceSource::Alias),
            None => (d.to_string(), DeviceSource::Explicit),
        });
    }
    if let Some(d) = &config.device {
        return Some((resolve_alias(d, config), DeviceSource::Default));
    }
    config
        .last_device
        .clone()
        .map(|d| (d, DeviceSource::Last))
}

/// Print device source feedback (e.g., "Using last connected device: ...").
pub fn print_device_source_feedback(
    original: Option<&str>,
    resolved: &str,
    source: DeviceSource,
    quiet: bool,
) {
    if quiet {
        return;
    }
    match source {
        DeviceSource::Explicit => {}
        DeviceSource::Alias => {
            eprintln!("Using device '{}' -> {}", original.unwrap_or(resolved), resolved)
        }
        DeviceSource::Default => eprintln!("Using default device: {}", resolved),
        DeviceSource::Last => eprintln!("Using last connected device: {}", resolved),
    }
}

/// Update the last connected device in config.
/// This is called after a successful connection.
pub fn update_last_device(identifier: &str, name: Option<&str>) -> Result<()> {
    let mut config = Config::load();
    config.last_device = Some(identifier.to_string());
    config.last_device_name = name.map(|n| n.to_string());
    config.save()
}

/// Resolve timeout: use provided value, fall back to config, then default
pub fn resolve_timeout(cmd_timeout: Option<u64>, config: &Config, default: u64) -> u64 {
    cmd_timeout.or(config.timeout).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_aliases(pairs: &[(&str, &str)]) -> Config {
        Config {
            aliases: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_device_prefers_arg() {
        let config = Config {
            device: Some("config-device".to_string()),
            ..Default::default()
        };
        let result = resolve_device(Some("arg-device"), &config);
        assert_eq!(
            result,
            Some(("arg-device".to_string(), DeviceSource::Explicit))
        );
    }

    #[test]
    fn test_resolve_device_resolves_alias() {
        let config = with_aliases(&[("desk", "AA:BB:CC:DD:EE:FF")]);
        let result = resolve_device(Some("desk"), &config);
        assert_eq!(
            result,
            Some(("AA:BB:CC:DD:EE:FF".to_string(), DeviceSource::Alias))
        );
    }

    #[test]
    fn test_resolve_device_falls_back_to_config() {
        let config = Config {
            device: Some("config-device".to_string()),
            last_device: Some("last-device".to_string()),
            ..Default::default()
        };
        let result = resolve_device(None, &config);
        assert_eq!(
            result,
            Some(("config-device".to_string(), DeviceSource::Default))
        );
    }

    #[test]
    fn test_resolve_device_default_may_be_alias() {
        let mut config = with_aliases(&[("hall", "11:22:33:44:55:66")]);
        config.device = Some("hall".to_string());
        let (device, _) = resolve_device(None, &config).unwrap();
        assert_eq!(device, "11:22:33:44:55:66");
    }

    #[test]
    fn test_resolve_device_falls_back_to_last() {
        let config = Config {
            last_device: Some("last-device".to_string()),
            ..Default::default()
        };
        let result = resolve_device(None, &config);
        assert_eq!(result, Some(("last-device".to_string(), DeviceSource::Last)));
    }

    #[test]
    fn test_resolve_device_none_when_all_empty() {
        assert_eq!(resolve_device(None, &Config::default()), None);
    }

    #[test]
    fn test_resolve_alias_not_found() {
        let config = Config::default();
        assert_eq!(resolve_alias("AA:BB:CC:DD:EE:FF", &config), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_resolve_timeout_uses_explicit_value() {
        let config = Config {
            timeout: Some(60),
            ..Default::default()
        };
        assert_eq!(resolve_timeout(Some(45), &config, 15), 45);
    }

    #[test]
    fn test_resolve_timeout_explicit_default_overrides_config() {
        let config = Config {
            timeout: Some(60),
            ..Default::default()
        };
        assert_eq!(resolve_timeout(Some(15), &config, 15), 15);
    }

    #[test]
    fn test_resolve_timeout_uses_config_when_unset() {
        let config = Config {
            timeout: Some(60),
            ..Default::default()
        };
        assert_eq!(resolve_timeout(None, &config, 15), 60);
    }

    #[test]
    fn test_resolve_timeout_uses_default_when_no_config() {
        assert_eq!(resolve_timeout(None, &Config::default(), 15), 15);
    }

    #[test]
    fn test_config_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = with_aliases(&[("desk", "AA:BB:CC:DD:EE:FF")]);
        config.timeout = Some(20);
        config.no_color = true;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_config_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_load_invalid_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout = \"soon\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_config_parses_partial_file() {
        let config: Config = toml::from_str("device = \"AA:BB:CC:DD:EE:FF\"\n").unwrap();
        assert_eq!(config.device.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert!(config.aliases.is_empty());
        assert!(!config.no_color);
    }
}
