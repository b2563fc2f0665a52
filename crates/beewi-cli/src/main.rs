use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use cli::{Cli, Commands, DeviceArgs};
use commands::Action;
use config::{Config, resolve_timeout};
use format::FormatOptions;

/// Connection timeout used when neither `--timeout` nor the config sets one.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "beewi", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let format = cli.format();
    let opts = FormatOptions::new(cli.no_color || config.no_color, cli.compact);
    let quiet = cli.quiet;

    let action = match cli.command {
        Commands::Scan { timeout, all } => {
            return commands::cmd_scan(timeout, all, format, quiet, &opts, &config).await;
        }
        Commands::Config { action } => return commands::cmd_config(action, quiet),
        Commands::Alias { action } => return commands::cmd_alias(action, quiet, opts.no_color),
        Commands::Completions { .. } => unreachable!("handled before tracing init"),
        Commands::Status { device } => {
            let (identifier, timeout) = target(&device, &config, quiet)?;
            return commands::cmd_status(&identifier, timeout, format, quiet, &opts).await;
        }
        Commands::Info { device } => {
            let (identifier, timeout) = target(&device, &config, quiet)?;
            return commands::cmd_info(&identifier, timeout, format, quiet, &opts).await;
        }
        Commands::On { device } => (device, Action::On),
        Commands::Off { device } => (device, Action::Off),
        Commands::Brightness { device, level } => (device, Action::Brightness(level)),
        Commands::Temperature { device, level } => (device, Action::Temperature(level)),
        Commands::White { device } => (device, Action::White),
        Commands::Color { device, rgb } => (device, Action::Color(rgb)),
        Commands::Sequence { device, index } => (device, Action::Sequence(index)),
    };

    let (device, action) = action;
    let (identifier, timeout) = target(&device, &config, quiet)?;
    commands::cmd_control(&identifier, timeout, action, format, quiet, &opts).await
}

/// Resolve the bulb identifier and connection timeout for a device command.
fn target(device: &DeviceArgs, config: &Config, quiet: bool) -> Result<(String, Duration)> {
    let identifier = util::require_device(device.device.as_deref(), config, quiet)?;
    let timeout = resolve_timeout(device.timeout, config, DEFAULT_TIMEOUT_SECS);
    Ok((identifier, Duration::from_secs(timeout)))
}
