//! Status command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use beewi_core::run_scoped;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_state_json, format_state_text};
use crate::util::connect_bulb;

pub async fn cmd_status(
    identifier: &str,
    timeout: Duration,
    format: OutputFormat,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let show_progress = !quiet && format == OutputFormat::Text;
    let bulb = connect_bulb(identifier, timeout, show_progress).await?;

    let state = run_scoped(bulb, async |bulb| bulb.settings().await)
        .await
        .context("Failed to read bulb status")?;

    let content = match format {
        OutputFormat::Json => format_state_json(&state, opts)?,
        OutputFormat::Text => format_state_text(&state, opts),
    };
    print!("{}", content);
    Ok(())
}
