//! Info command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use beewi_core::run_scoped;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_info_text};
use crate::util::connect_bulb;

pub async fn cmd_info(
    identifier: &str,
    timeout: Duration,
    format: OutputFormat,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let show_progress = !quiet && format == OutputFormat::Text;
    let bulb = connect_bulb(identifier, timeout, show_progress).await?;

    let info = run_scoped(bulb, async |bulb| bulb.hardware_info().await)
        .await
        .context("Failed to read hardware information")?;

    let content = match format {
        OutputFormat::Json => opts.as_json(&info)?,
        OutputFormat::Text => format_info_text(&info, opts),
    };
    print!("{}", content);
    Ok(())
}
