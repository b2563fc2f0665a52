//! Alias command implementation.
//!
//! Manages friendly bulb names (aliases) that map to device addresses.

use anyhow::{Result, bail};
use tabled::builder::Builder;

use crate::cli::AliasAction;
use crate::config::Config;
use crate::style;

pub fn cmd_alias(action: AliasAction, quiet: bool, no_color: bool) -> Result<()> {
    let mut config = Config::load();

    if let AliasAction::List = action {
        if config.aliases.is_empty() {
            if !quiet {
                println!("No aliases configured.");
                println!();
                println!("Add an alias with: beewi alias set <name> <address>");
            }
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Alias", "Device Address"]);
            for (name, address) in &config.aliases {
                builder.push_record([name.as_str(), address.as_str()]);
            }
            let mut table = builder.build();
            style::apply_table_style(&mut table, no_color);
            println!("{}", table);
        }
        return Ok(());
    }

    let message = apply_alias(&mut config, action)?;
    config.save()?;
    if !quiet {
        println!("{}", style::format_success(&message, no_color));
    }
    Ok(())
}

/// Apply a `set` or `remove` action to the config, returning a summary line.
fn apply_alias(config: &mut Config, action: AliasAction) -> Result<String> {
    match action {
        AliasAction::List => Ok(String::new()),
        AliasAction::Set { name, address } => {
            if looks_like_address(&name) {
                bail!(
                    "Alias name '{}' looks like a device address. \
                     Use a friendly name instead (e.g., 'desk', 'hallway').",
                    name
                );
            }

            let verb = if config.aliases.contains_key(&name) {
                "Updated"
            } else {
                "Added"
            };
            let message = format!("{} alias '{}' -> {}", verb, name, address);
            config.aliases.insert(name, address);
            Ok(message)
        }
        AliasAction::Remove { name } => {
            if config.aliases.remove(&name).is_none() {
                bail!("Alias '{}' not found", name);
            }
            Ok(format!("Removed alias '{}'", name))
        }
    }
}

/// Check if a string looks like a device address (MAC or UUID).
fn looks_like_address(s: &str) -> bool {
    let mac_pattern = s.chars().filter(|c| *c == ':' || *c == '-').count() >= 5
        && s.chars()
            .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '-');

    let uuid_pattern = s.len() >= 32 && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-');

    mac_pattern || uuid_pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_address() {
        assert!(looks_like_address("AA:BB:CC:DD:EE:FF"));
        assert!(looks_like_address("aa-bb-cc-dd-ee-ff"));
        assert!(looks_like_address("12345678-1234-1234-1234-123456789abc"));
        assert!(!looks_like_address("desk-lamp"));
        assert!(!looks_like_address("SmartLite"));
    }

    #[test]
    fn test_apply_alias_set_and_update() {
        let mut config = Config::default();
        let added = apply_alias(
            &mut config,
            AliasAction::Set {
                name: "desk".to_string(),
                address: "AA:BB:CC:DD:EE:FF".to_string(),
            },
        )
        .unwrap();
        assert!(added.starts_with("Added"));

        let updated = apply_alias(
            &mut config,
            AliasAction::Set {
                name: "desk".to_string(),
                address: "11:22:33:44:55:66".to_string(),
            },
        )
        .unwrap();
        assert!(updated.starts_with("Updated"));
        assert_eq!(config.aliases["desk"], "11:22:33:44:55:66");
    }

    #[test]
    fn test_apply_alias_rejects_address_as_name() {
        let mut config = Config::default();
        let result = apply_alias(
            &mut config,
            AliasAction::Set {
                name: "AA:BB:CC:DD:EE:FF".to_string(),
                address: "AA:BB:CC:DD:EE:FF".to_string(),
            },
        );
        assert!(result.is_err());
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_apply_alias_remove_missing_fails() {
        let mut config = Config::default();
        let result = apply_alias(
            &mut config,
            AliasAction::Remove {
                name: "nowhere".to_string(),
            },
        );
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
