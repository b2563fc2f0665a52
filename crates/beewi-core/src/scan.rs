//! Bulb discovery and scanning.
//!
//! This module provides functionality to scan for BeeWi bulbs
//! using Bluetooth Low Energy.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DeviceNotFoundReason, Error, Result};
use crate::util::{create_identifier, format_peripheral_id, matches_identifier};
use crate::uuid::SMARTLITE_CONTROL_SERVICE;

/// Name fragments used by BeeWi bulbs in their advertisements.
const BULB_NAME_HINTS: [&str; 2] = ["beewi", "smartlite"];

/// Progress update for device finding operations.
#[derive(Debug, Clone)]
pub enum FindProgress {
    /// Found device in cache, no scan needed.
    CacheHit,
    /// Starting scan attempt.
    ScanAttempt {
        /// Current attempt number (1-based).
        attempt: u32,
        /// Total number of attempts.
        total: u32,
        /// Duration of this scan attempt.
        duration_secs: u64,
    },
    /// Device found on specific attempt.
    Found { attempt: u32 },
    /// Attempt failed, will retry.
    RetryNeeded { attempt: u32 },
}

/// Callback type for progress updates during device finding.
pub type ProgressCallback = Box<dyn Fn(FindProgress) + Send + Sync>;

/// Information about a discovered peripheral.
#[derive(Debug, Clone)]
pub struct DiscoveredBulb {
    /// The advertised name (e.g., "BeeWi SmartLite").
    pub name: Option<String>,
    /// The peripheral ID for connecting.
    pub id: PeripheralId,
    /// The BLE address as a string (may be zeros on macOS, use `identifier` instead).
    pub address: String,
    /// A connection identifier (peripheral ID on macOS, address on other platforms).
    pub identifier: String,
    /// RSSI signal strength.
    pub rssi: Option<i16>,
    /// Whether the peripheral looks like a BeeWi bulb.
    pub is_bulb: bool,
}

/// Options for scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How long to scan for devices.
    pub duration: Duration,
    /// Only return peripherals that appear to be BeeWi bulbs.
    pub filter_bulbs_only: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5),
            filter_bulbs_only: true,
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set scan duration in seconds.
    #[must_use]
    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration = Duration::from_secs(secs);
        self
    }

    /// Set whether to filter for BeeWi bulbs only.
    #[must_use]
    pub fn filter_bulbs_only(mut self, filter: bool) -> Self {
        self.filter_bulbs_only = filter;
        self
    }

    /// Scan for all BLE devices, not just bulbs.
    #[must_use]
    pub fn all_devices(self) -> Self {
        self.filter_bulbs_only(false)
    }
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Scan for BeeWi bulbs in range.
///
/// An empty list indicates no bulbs were found (not an error).
///
/// # Errors
///
/// Returns an error if no Bluetooth adapter is available or the scan
/// could not be started or stopped.
pub async fn scan_for_bulbs() -> Result<Vec<DiscoveredBulb>> {
    scan_with_options(ScanOptions::default()).await
}

/// Scan for devices with custom options.
pub async fn scan_with_options(options: ScanOptions) -> Result<Vec<DiscoveredBulb>> {
    let adapter = get_adapter().await?;
    scan_with_adapter(&adapter, options).await
}

/// Scan for devices using a specific adapter.
#[tracing::instrument(level = "info", skip_all, fields(duration_secs = options.duration.as_secs()))]
pub async fn scan_with_adapter(
    adapter: &Adapter,
    options: ScanOptions,
) -> Result<Vec<DiscoveredBulb>> {
    info!("Starting BLE scan...");

    adapter.start_scan(ScanFilter::default()).await?;
    sleep(options.duration).await;
    adapter.stop_scan().await?;

    let peripherals = adapter.peripherals().await?;
    let mut discovered = Vec::new();

    for peripheral in peripherals {
        match process_peripheral(&peripheral, options.filter_bulbs_only).await {
            Ok(Some(bulb)) => {
                info!("Found device: {:?}", bulb.name);
                discovered.push(bulb);
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Error processing peripheral: {}", e);
            }
        }
    }

    info!("Scan complete. Found {} device(s)", discovered.len());
    Ok(discovered)
}

async fn process_peripheral(
    peripheral: &Peripheral,
    filter_bulbs_only: bool,
) -> Result<Option<DiscoveredBulb>> {
    let Some(properties) = peripheral.properties().await? else {
        return Ok(None);
    };

    let is_bulb = is_beewi_bulb(properties.local_name.as_deref(), &properties.services);
    if filter_bulbs_only && !is_bulb {
        return Ok(None);
    }

    let id = peripheral.id();
    let address = properties.address.to_string();
    let identifier = create_identifier(&address, &id);

    Ok(Some(DiscoveredBulb {
        name: properties.local_name,
        id,
        address,
        identifier,
        rssi: properties.rssi,
        is_bulb,
    }))
}

/// Check if advertised data looks like a BeeWi bulb.
///
/// True when the SmartLite control service is advertised or the name
/// contains "BeeWi" or "SmartLite" (case-insensitive).
pub fn is_beewi_bulb(name: Option<&str>, services: &[Uuid]) -> bool {
    if services.contains(&SMARTLITE_CONTROL_SERVICE) {
        return true;
    }

    name.map(str::to_lowercase)
        .is_some_and(|n| BULB_NAME_HINTS.iter().any(|hint| n.contains(hint)))
}

/// Find a specific device by address, peripheral id or name.
pub async fn find_device(identifier: &str) -> Result<(Adapter, Peripheral)> {
    find_device_with_options(identifier, ScanOptions::default()).await
}

/// Find a specific device with custom options.
///
/// 1. Checks whether the device is already known to the adapter.
/// 2. Performs up to 3 scan attempts with increasing durations.
pub async fn find_device_with_options(
    identifier: &str,
    options: ScanOptions,
) -> Result<(Adapter, Peripheral)> {
    find_device_with_progress(identifier, options, None).await
}

/// Find a specific device with progress callback for UI feedback.
#[tracing::instrument(level = "info", skip(options, progress))]
pub async fn find_device_with_progress(
    identifier: &str,
    options: ScanOptions,
    progress: Option<ProgressCallback>,
) -> Result<(Adapter, Peripheral)> {
    let adapter = get_adapter().await?;
    let identifier_lower = identifier.to_lowercase();

    if let Some(peripheral) = find_peripheral_by_identifier(&adapter, &identifier_lower).await? {
        info!("Found device in cache (no scan needed)");
        if let Some(ref cb) = progress {
            cb(FindProgress::CacheHit);
        }
        return Ok((adapter, peripheral));
    }

    // Advertisements can be missed, so scan several times with growing windows
    let max_attempts: u32 = 3;
    let base_duration = options.duration.as_millis() as u64 / 2;
    let base_duration = Duration::from_millis(base_duration.max(2000));

    for attempt in 1..=max_attempts {
        let scan_duration = base_duration * attempt;
        let duration_secs = scan_duration.as_secs();

        info!(
            "Scan attempt {}/{} ({}s)...",
            attempt, max_attempts, duration_secs
        );
        if let Some(ref cb) = progress {
            cb(FindProgress::ScanAttempt {
                attempt,
                total: max_attempts,
                duration_secs,
            });
        }

        adapter.start_scan(ScanFilter::default()).await?;
        sleep(scan_duration).await;
        adapter.stop_scan().await?;

        if let Some(peripheral) =
            find_peripheral_by_identifier(&adapter, &identifier_lower).await?
        {
            info!("Found device on attempt {}", attempt);
            if let Some(ref cb) = progress {
                cb(FindProgress::Found { attempt });
            }
            return Ok((adapter, peripheral));
        }

        if attempt < max_attempts {
            warn!("Device not found, retrying...");
            if let Some(ref cb) = progress {
                cb(FindProgress::RetryNeeded { attempt });
            }
        }
    }

    warn!(
        "Device not found after {} attempts: {}",
        max_attempts, identifier
    );
    Err(Error::device_not_found(identifier))
}

async fn find_peripheral_by_identifier(
    adapter: &Adapter,
    identifier_lower: &str,
) -> Result<Option<Peripheral>> {
    let peripherals = adapter.peripherals().await?;

    for peripheral in peripherals {
        if let Ok(Some(props)) = peripheral.properties().await {
            let address = props.address.to_string();
            let peripheral_id = format_peripheral_id(&peripheral.id());

            if matches_identifier(
                identifier_lower,
                &address,
                &peripheral_id,
                props.local_name.as_deref(),
            ) {
                debug!(address = %address, name = ?props.local_name, "Matched peripheral");
                return Ok(Some(peripheral));
            }
        }
    }

    Ok(None)
}
