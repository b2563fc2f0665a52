//! CLI argument definitions using clap.

use beewi_types::{Level, Rgb, SequenceIndex};
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reusable device connection arguments
#[derive(Debug, Clone, Args)]
pub struct DeviceArgs {
    /// Bulb address, name or alias, or use BEEWI_DEVICE env var
    #[arg(short, long, env = "BEEWI_DEVICE")]
    pub device: Option<String>,

    /// Connection timeout in seconds [default: 15, or `timeout` from config]
    #[arg(short = 'T', long)]
    pub timeout: Option<u64>,
}

#[derive(Parser)]
#[command(name = "beewi")]
#[command(author, version, about = "CLI for BeeWi SmartLite bulbs", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format selected by the global flags.
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for nearby bulbs
    Scan {
        /// Scan timeout in seconds
        #[arg(short, long, default_value = "5")]
        timeout: u64,

        /// List every BLE peripheral, not only bulbs
        #[arg(short, long)]
        all: bool,
    },

    /// Show the bulb's current settings
    Status {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Show the bulb's hardware information
    Info {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Turn the bulb on
    On {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Turn the bulb off
    Off {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Set brightness
    Brightness {
        #[command(flatten)]
        device: DeviceArgs,

        /// Brightness level (0-9)
        #[arg(value_parser = parse_brightness)]
        level: u8,
    },

    /// Set white temperature (only applies in white mode)
    Temperature {
        #[command(flatten)]
        device: DeviceArgs,

        /// Temperature level (0 warm to 9 cold)
        #[arg(value_parser = parse_temperature)]
        level: u8,
    },

    /// Switch the bulb to white mode
    White {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Set an RGB colour
    Color {
        #[command(flatten)]
        device: DeviceArgs,

        /// Colour as "r,g,b" (0-255 each) or "#rrggbb"
        #[arg(value_parser = parse_rgb)]
        rgb: Rgb,
    },

    /// Start one of the bulb's built-in colour sequences
    Sequence {
        #[command(flatten)]
        device: DeviceArgs,

        /// Sequence index (0-4)
        #[arg(value_parser = parse_sequence)]
        index: u8,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage device aliases (friendly names)
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Alias subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum AliasAction {
    /// List all device aliases
    List,

    /// Set a device alias
    Set {
        /// Friendly name for the bulb (e.g., "desk", "hallway")
        name: String,

        /// Bulb address (MAC address or UUID)
        address: String,
    },

    /// Remove a device alias
    #[command(alias = "rm")]
    Remove {
        /// Alias name to remove
        name: String,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigKey {
    /// Default device address
    Device,
    /// Default connection timeout in seconds
    Timeout,
    /// Disable colored output
    NoColor,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,
}

fn parse_integer(s: &str) -> Result<i64, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

fn parse_brightness(s: &str) -> Result<u8, String> {
    let level = Level::checked("brightness", parse_integer(s)?).map_err(|e| e.to_string())?;
    Ok(level.get())
}

fn parse_temperature(s: &str) -> Result<u8, String> {
    let level = Level::checked("temperature", parse_integer(s)?).map_err(|e| e.to_string())?;
    Ok(level.get())
}

fn parse_sequence(s: &str) -> Result<u8, String> {
    let index = SequenceIndex::checked(parse_integer(s)?).map_err(|e| e.to_string())?;
    Ok(index.get())
}

fn parse_rgb(s: &str) -> Result<Rgb, String> {
    s.parse().map_err(|e: beewi_types::ValidationError| e.to_string())
}

/// Parse boolean argument with flexible input
pub fn parse_bool_arg(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        )),
    }
}
