//! Scan command implementation.

use anyhow::{Context, Result};
use beewi_core::{ScanOptions, scan};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::{FormatOptions, format_scan_json, format_scan_text};
use crate::style;

pub async fn cmd_scan(
    timeout: u64,
    all: bool,
    format: OutputFormat,
    quiet: bool,
    opts: &FormatOptions,
    config: &Config,
) -> Result<()> {
    let spinner = (!quiet && format == OutputFormat::Text).then(|| style::scanning_spinner(timeout));

    let options = ScanOptions::default()
        .duration_secs(timeout)
        .filter_bulbs_only(!all);

    let result = scan::scan_with_options(options).await;

    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    let bulbs = result.context("Failed to scan for bulbs")?;

    let content = match format {
        OutputFormat::Json => format_scan_json(&bulbs, opts)?,
        OutputFormat::Text => format_scan_text(&bulbs, opts, &config.aliases, !quiet),
    };
    print!("{}", content);

    Ok(())
}
