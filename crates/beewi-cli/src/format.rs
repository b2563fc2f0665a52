//! Output formatting utilities for text and JSON output.

use std::collections::BTreeMap;

use anyhow::Result;
use beewi_core::DiscoveredBulb;
use beewi_types::{BulbMode, BulbState, HardwareInfo, PowerState};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool, compact: bool) -> Self {
        Self { no_color, compact }
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

// ============================================================================
// Scan formatting
// ============================================================================

pub fn format_scan_json(bulbs: &[DiscoveredBulb], opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct ScanResult<'a> {
        count: usize,
        devices: Vec<BulbJson<'a>>,
    }

    #[derive(Serialize)]
    struct BulbJson<'a> {
        name: Option<&'a str>,
        address: &'a str,
        identifier: &'a str,
        rssi: Option<i16>,
        is_bulb: bool,
    }

    let result = ScanResult {
        count: bulbs.len(),
        devices: bulbs
            .iter()
            .map(|b| BulbJson {
                name: b.name.as_deref(),
                address: &b.address,
                identifier: &b.identifier,
                rssi: b.rssi,
                is_bulb: b.is_bulb,
            })
            .collect(),
    };

    opts.as_json(&result)
}

/// Find the alias saved for an identifier, if any.
fn alias_for<'a>(aliases: &'a BTreeMap<String, String>, identifier: &str) -> Option<&'a str> {
    let id_lower = identifier.to_lowercase();
    aliases
        .iter()
        .find(|(_, v)| v.to_lowercase() == id_lower)
        .map(|(k, _)| k.as_str())
}

/// Format scan results as a table, with an alias column for known bulbs.
#[must_use]
pub fn format_scan_text(
    bulbs: &[DiscoveredBulb],
    opts: &FormatOptions,
    aliases: &BTreeMap<String, String>,
    show_tips: bool,
) -> String {
    use tabled::{Table, Tabled};

    if bulbs.is_empty() {
        return "No BeeWi bulbs found.\n".to_string();
    }

    #[derive(Tabled)]
    struct BulbRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Alias")]
        alias: String,
        #[tabled(rename = "Signal")]
        signal: String,
        #[tabled(rename = "Identifier")]
        identifier: String,
    }

    let count = if opts.no_color {
        bulbs.len().to_string()
    } else {
        bulbs.len().to_string().green().bold().to_string()
    };
    let header = format!("Found {} bulb(s)\n\n", count);

    let rows: Vec<BulbRow> = bulbs
        .iter()
        .map(|b| {
            let name = b.name.as_deref().unwrap_or("Unknown");
            BulbRow {
                name: if opts.no_color {
                    name.to_string()
                } else {
                    name.cyan().to_string()
                },
                alias: alias_for(aliases, &b.identifier).unwrap_or("-").to_string(),
                signal: style::format_signal_bar(b.rssi, opts.no_color),
                identifier: b.identifier.clone(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    style::apply_table_style(&mut table, opts.no_color);

    let mut output = format!("{}{}\n", header, table);
    if show_tips {
        output.push_str(&format_scan_tips(opts.no_color));
    }
    output
}

/// Format helpful tips shown after scan results.
#[must_use]
pub fn format_scan_tips(no_color: bool) -> String {
    let tip_label = if no_color {
        "Tip:".to_string()
    } else {
        "Tip:".yellow().bold().to_string()
    };
    format!(
        "\n{} Use 'beewi alias set <name> <identifier>' to save a bulb alias\n     Use 'beewi config set device <identifier>' to set as default\n",
        tip_label
    )
}

// ============================================================================
// Status formatting
// ============================================================================

/// Format a bulb state as the labelled settings report.
#[must_use]
pub fn format_state_text(state: &BulbState, opts: &FormatOptions) -> String {
    if opts.no_color {
        return format!("{}\n", state);
    }

    let power = match state.power {
        PowerState::On => "on".green().bold().to_string(),
        PowerState::Off => "off".red().to_string(),
        other => other.yellow().to_string(),
    };
    let mode = match state.mode {
        BulbMode::White => "white".bold().to_string(),
        BulbMode::Color => "color".magenta().bold().to_string(),
        BulbMode::Unknown => "unknown".yellow().to_string(),
    };
    let level = |value: Option<u8>| {
        value.map_or_else(|| "N/A".dimmed().to_string(), |v| v.to_string())
    };
    let rgb = state.rgb;
    let swatch = "███".truecolor(rgb.red, rgb.green, rgb.blue).to_string();

    format!(
        "       ON/OFF : {}\n  WHITE/COLOR : {}\n   BRIGHTNESS : {}\n  TEMPERATURE : {}\nCOLOR (R/G/B) : {} {}\n",
        power,
        mode,
        level(state.brightness),
        level(state.temperature),
        rgb,
        swatch
    )
}

pub fn format_state_json(state: &BulbState, opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct StateJson<'a> {
        #[serde(flatten)]
        state: &'a BulbState,
        color: Option<String>,
    }

    opts.as_json(&StateJson {
        state,
        color: state.color().map(|c| {
            format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
        }),
    })
}

// ============================================================================
// Info formatting
// ============================================================================

#[must_use]
pub fn format_info_text(info: &HardwareInfo, opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    let mut builder = Builder::default();
    builder.push_record(["Property", "Value"]);
    builder.push_record(["MAC Address", &info.mac_address]);
    builder.push_record(["Model", &info.model_number]);
    builder.push_record(["Firmware", &info.firmware_revision]);
    builder.push_record(["Hardware", &info.hardware_revision]);
    if let Some(software) = &info.software_revision {
        builder.push_record(["Software", software]);
    }
    builder.push_record(["Manufacturer", &info.manufacturer_name]);

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.no_color);

    format!(
        "{}\n{}\n",
        style::format_title("Hardware Information", opts.no_color),
        table
    )
}
