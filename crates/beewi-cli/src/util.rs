//! Utility functions for CLI operations.

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use beewi_core::{
    BulbController, ConnectionConfig, Device, ErrorKind, FindProgress, ProgressCallback,
};
use indicatif::ProgressBar;

use crate::config::{Config, print_device_source_feedback, resolve_device, update_last_device};
use crate::style;

/// Resolve the device identifier, with helpful error message.
pub fn require_device(device: Option<&str>, config: &Config, quiet: bool) -> Result<String> {
    let (resolved, source) = resolve_device(device, config).ok_or_else(|| {
        anyhow!(
            "No device specified. Use --device <ADDRESS> or set BEEWI_DEVICE environment variable.\n\
             Run 'beewi scan' to find nearby bulbs."
        )
    })?;
    print_device_source_feedback(device, &resolved, source, quiet);
    Ok(resolved)
}

fn progress_callback(spinner: Arc<ProgressBar>) -> ProgressCallback {
    Box::new(move |progress: FindProgress| match progress {
        FindProgress::CacheHit => spinner.set_message("Found bulb (cached)"),
        FindProgress::ScanAttempt {
            attempt,
            total,
            duration_secs,
        } => spinner.set_message(format!(
            "Scanning... (attempt {}/{}, {}s)",
            attempt, total, duration_secs
        )),
        FindProgress::Found { .. } => spinner.set_message("Connecting..."),
        FindProgress::RetryNeeded { attempt } => {
            spinner.set_message(format!("Not found, retrying... (attempt {})", attempt + 1))
        }
    })
}

/// Troubleshooting hints for a failed connection, by error class.
fn connection_hints(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Connection => {
            "\n\nPossible causes:\n  \
             - Bluetooth may be disabled -- check system settings\n  \
             - Bulb may be out of range or unpowered\n  \
             - Bulb may be connected to another host (e.g. the phone app)\n  \
             - Address may be incorrect -- run 'beewi scan' to verify"
        }
        ErrorKind::Protocol => {
            "\n\nThe bulb answered but its reply was not understood.\n\
             Make sure the device is a BeeWi SmartLite bulb."
        }
        ErrorKind::Validation => "",
    }
}

/// Connect to a bulb and read its initial status, showing a spinner on a terminal.
pub async fn connect_bulb(
    identifier: &str,
    timeout: Duration,
    show_progress: bool,
) -> Result<BulbController<Device>> {
    let spinner = (show_progress && io::stderr().is_terminal())
        .then(|| Arc::new(style::connecting_spinner(identifier)));

    let config = ConnectionConfig::default().connection_timeout(timeout);
    let progress = spinner.clone().map(progress_callback);

    let result = match Device::connect_with_progress(identifier, config, progress).await {
        Ok(device) => BulbController::new(device).await,
        Err(e) => Err(e),
    };

    if let Some(sp) = &spinner {
        sp.finish_and_clear();
    }

    let controller = result.map_err(|e| {
        anyhow!(
            "Failed to connect to bulb: {}\n\nCause: {}{}",
            identifier,
            e,
            connection_hints(e.kind())
        )
    })?;

    // Remembering the bulb is a convenience; a read-only config dir must not fail the command.
    let transport = controller.transport();
    if let Err(e) = update_last_device(transport.address(), transport.name()) {
        tracing::debug!("Failed to save last device: {}", e);
    }

    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_device_with_some() {
        let result = require_device(Some("AA:BB:CC:DD:EE:FF"), &Config::default(), true);
        assert_eq!(result.unwrap(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_require_device_with_none() {
        let err = require_device(None, &Config::default(), true)
            .unwrap_err()
            .to_string();
        assert!(err.contains("No device specified"));
        assert!(err.contains("BEEWI_DEVICE"));
    }

    #[test]
    fn test_require_device_uses_config_default() {
        let config = Config {
            device: Some("11:22:33:44:55:66".to_string()),
            ..Default::default()
        };
        assert_eq!(
            require_device(None, &config, true).unwrap(),
            "11:22:33:44:55:66"
        );
    }

    #[test]
    fn test_connection_hints_by_kind() {
        assert!(connection_hints(ErrorKind::Connection).contains("beewi scan"));
        assert!(connection_hints(ErrorKind::Protocol).contains("SmartLite"));
        assert!(connection_hints(ErrorKind::Validation).is_empty());
    }

    #[test]
    fn test_progress_callback_updates_message() {
        let spinner = Arc::new(ProgressBar::hidden());
        let callback = progress_callback(spinner.clone());
        callback(FindProgress::ScanAttempt {
            attempt: 2,
            total: 3,
            duration_secs: 5,
        });
        assert_eq!(spinner.message(), "Scanning... (attempt 2/3, 5s)");
        callback(FindProgress::CacheHit);
        assert_eq!(spinner.message(), "Found bulb (cached)");
    }
}
