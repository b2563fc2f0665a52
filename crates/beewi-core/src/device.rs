//! Bluetooth connection to a BeeWi bulb.
//!
//! [`Device`] owns a connected `btleplug` peripheral and implements
//! [`BulbTransport`] on top of it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _, WriteType};
use btleplug::platform::{Adapter, Peripheral};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ConnectionFailureReason, Error, Result};
use crate::scan::{ProgressCallback, ScanOptions, find_device_with_progress};
use crate::traits::BulbTransport;
use crate::util::{create_identifier, format_peripheral_id};
use crate::uuid::{DEVICE_INFO_SERVICE, SMARTLITE_READ_SETTINGS, SMARTLITE_SETTINGS};

/// A connected BeeWi bulb.
///
/// `Device` does not implement `Clone`: it represents one active BLE
/// connection. Wrap it in `Arc` to share it.
///
/// # Cleanup
///
/// Call [`Device::disconnect`] before dropping. A device dropped while still
/// connected logs a warning and spawns a best-effort disconnect.
pub struct Device {
    /// Kept alive for the lifetime of the peripheral connection.
    #[allow(dead_code)]
    adapter: Adapter,
    peripheral: Peripheral,
    name: Option<String>,
    /// MAC address on Linux/Windows, UUID on macOS.
    address: String,
    /// Discovered characteristics by UUID.
    characteristics_cache: RwLock<HashMap<Uuid, Characteristic>>,
    service_count: usize,
    has_device_info: bool,
    disconnected: AtomicBool,
    config: ConnectionConfig,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("has_device_info", &self.has_device_info)
            .finish_non_exhaustive()
    }
}

/// Default timeout for BLE characteristic read operations.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for BLE characteristic write operations.
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for BLE connection operations.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for service discovery.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for BLE connection timeouts.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use beewi_core::device::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .connection_timeout(Duration::from_secs(20))
///     .read_timeout(Duration::from_secs(15));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Timeout for establishing a BLE connection. Also used as the base
    /// scan window when looking the bulb up.
    pub connection_timeout: Duration,
    /// Timeout for BLE read operations.
    pub read_timeout: Duration,
    /// Timeout for BLE write operations.
    pub write_timeout: Duration,
    /// Timeout for service discovery after connection.
    pub discovery_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }
}

impl ConnectionConfig {
    /// Create a new connection config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the write timeout.
    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the service discovery timeout.
    #[must_use]
    pub fn discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }
}

impl Device {
    /// Connect to a bulb by MAC address, platform id or name.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use beewi_core::device::Device;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let device = Device::connect("AA:BB:CC:DD:EE:FF").await?;
    ///     println!("Connected to {:?}", device);
    ///     device.disconnect().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(identifier: &str) -> Result<Self> {
        Self::connect_with_config(identifier, ConnectionConfig::default()).await
    }

    /// Connect with custom timeouts.
    pub async fn connect_with_config(identifier: &str, config: ConnectionConfig) -> Result<Self> {
        Self::connect_with_progress(identifier, config, None).await
    }

    /// Connect with custom timeouts, reporting lookup progress.
    #[tracing::instrument(level = "info", skip(config, progress))]
    pub async fn connect_with_progress(
        identifier: &str,
        config: ConnectionConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<Self> {
        let options = ScanOptions::default()
            .duration(config.connection_timeout)
            .all_devices();

        let (adapter, peripheral) = find_device_with_progress(identifier, options, progress).await?;
        Self::from_peripheral_with_config(adapter, peripheral, config).await
    }

    /// Create a Device from an already-discovered peripheral.
    pub async fn from_peripheral(adapter: Adapter, peripheral: Peripheral) -> Result<Self> {
        Self::from_peripheral_with_config(adapter, peripheral, ConnectionConfig::default()).await
    }

    /// Create a Device from an already-discovered peripheral with full configuration.
    ///
    /// Fails with [`Error::CharacteristicNotFound`] if the bulb does not expose
    /// both SmartLite settings characteristics. The peripheral is disconnected
    /// again in that case.
    #[tracing::instrument(level = "info", skip_all, fields(connect_timeout = ?config.connection_timeout))]
    pub async fn from_peripheral_with_config(
        adapter: Adapter,
        peripheral: Peripheral,
        config: ConnectionConfig,
    ) -> Result<Self> {
        let peripheral_id = format_peripheral_id(&peripheral.id());

        info!("Connecting to device...");
        timeout(config.connection_timeout, peripheral.connect())
            .await
            .map_err(|_| {
                Error::connection_failed(
                    Some(peripheral_id.clone()),
                    ConnectionFailureReason::Timeout,
                )
            })?
            .map_err(|e| {
                Error::connection_failed(
                    Some(peripheral_id.clone()),
                    ConnectionFailureReason::BleError(e.to_string()),
                )
            })?;
        info!("Connected!");

        info!("Discovering services...");
        let discovered = match timeout(config.discovery_timeout, peripheral.discover_services()).await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::connection_failed(
                Some(peripheral_id.clone()),
                ConnectionFailureReason::BleError(e.to_string()),
            )),
            Err(_) => Err(Error::connection_failed(
                Some(peripheral_id.clone()),
                ConnectionFailureReason::Timeout,
            )),
        };
        release_on_error(discovered, async || drop_link(&peripheral).await).await?;

        let services = peripheral.services();
        let service_count = services.len();
        debug!("Found {} services", service_count);

        let mut characteristics_cache = HashMap::new();
        let mut has_device_info = false;
        for service in &services {
            debug!("  Service: {}", service.uuid);
            has_device_info |= service.uuid == DEVICE_INFO_SERVICE;
            for char in &service.characteristics {
                debug!("    Characteristic: {}", char.uuid);
                characteristics_cache.insert(char.uuid, char.clone());
            }
        }

        for required in [SMARTLITE_SETTINGS, SMARTLITE_READ_SETTINGS] {
            if !characteristics_cache.contains_key(&required) {
                warn!("Required characteristic {} missing, disconnecting", required);
                drop_link(&peripheral).await;
                return Err(Error::characteristic_not_found(
                    required.to_string(),
                    service_count,
                ));
            }
        }

        let properties = release_on_error(
            peripheral.properties().await.map_err(Error::from),
            async || drop_link(&peripheral).await,
        )
        .await?;
        let name = properties.as_ref().and_then(|p| p.local_name.clone());

        // macOS reports 00:00:00:00:00:00, so fall back to the peripheral id
        let address = properties
            .as_ref()
            .map(|p| create_identifier(&p.address.to_string(), &peripheral.id()))
            .unwrap_or(peripheral_id);

        Ok(Self {
            adapter,
            peripheral,
            name,
            address,
            characteristics_cache: RwLock::new(characteristics_cache),
            service_count,
            has_device_info,
            disconnected: AtomicBool::new(false),
            config,
        })
    }

    /// Check if the device is connected (queries BLE stack state).
    pub async fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst)
            && self.peripheral.is_connected().await.unwrap_or(false)
    }

    /// Get the current connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Disconnect from the device.
    #[tracing::instrument(level = "info", skip(self), fields(address = %self.address))]
    pub async fn disconnect(&self) -> Result<()> {
        info!("Disconnecting from device...");
        self.disconnected.store(true, Ordering::SeqCst);
        self.peripheral.disconnect().await?;
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the device address or identifier.
    ///
    /// On Linux and Windows, this returns the Bluetooth MAC address (e.g., "AA:BB:CC:DD:EE:FF").
    /// On macOS, this returns a UUID identifier since MAC addresses are not exposed.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether the Device Information service was discovered.
    pub fn has_device_info(&self) -> bool {
        self.has_device_info
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.disconnected.load(Ordering::SeqCst) {
            Err(Error::NotConnected)
        } else {
            Ok(())
        }
    }

    async fn find_characteristic(&self, uuid: Uuid) -> Result<Characteristic> {
        self.characteristics_cache
            .read()
            .await
            .get(&uuid)
            .cloned()
            .ok_or_else(|| Error::characteristic_not_found(uuid.to_string(), self.service_count))
    }

    /// Read a characteristic value by UUID.
    ///
    /// The timeout is controlled by [`ConnectionConfig::read_timeout`].
    pub async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>> {
        self.ensure_connected()?;
        let characteristic = self.find_characteristic(uuid).await?;
        let data = timeout(self.config.read_timeout, self.peripheral.read(&characteristic))
            .await
            .map_err(|_| {
                Error::timeout(format!("read characteristic {}", uuid), self.config.read_timeout)
            })?
            .map_err(|e| Error::read_failed(uuid.to_string(), e.to_string()))?;
        debug!(%uuid, len = data.len(), "Read characteristic");
        Ok(data)
    }

    /// Write a value to a characteristic, waiting for the response.
    ///
    /// The timeout is controlled by [`ConnectionConfig::write_timeout`].
    pub async fn write_characteristic(&self, uuid: Uuid, data: &[u8]) -> Result<()> {
        self.ensure_connected()?;
        let characteristic = self.find_characteristic(uuid).await?;
        timeout(
            self.config.write_timeout,
            self.peripheral
                .write(&characteristic, data, WriteType::WithResponse),
        )
        .await
        .map_err(|_| {
            Error::timeout(format!("write characteristic {}", uuid), self.config.write_timeout)
        })?
        .map_err(|e| Error::write_failed(uuid.to_string(), e.to_string()))?;
        debug!(%uuid, data = ?data, "Wrote characteristic");
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if !self.disconnected.swap(true, Ordering::SeqCst) {
            warn!(
                device_name = ?self.name,
                device_address = %self.address,
                "Device dropped without calling disconnect() - performing best-effort cleanup"
            );

            let peripheral = self.peripheral.clone();
            let address = self.address.clone();

            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    if let Err(e) = peripheral.disconnect().await {
                        debug!(
                            device_address = %address,
                            error = %e,
                            "Best-effort disconnect failed (device may already be disconnected)"
                        );
                    } else {
                        debug!(device_address = %address, "Best-effort disconnect completed");
                    }
                });
            }
        }
    }
}

#[async_trait]
impl BulbTransport for Device {
    async fn is_connected(&self) -> bool {
        Device::is_connected(self).await
    }

    async fn disconnect(&self) -> Result<()> {
        Device::disconnect(self).await
    }

    fn name(&self) -> Option<&str> {
        Device::name(self)
    }

    fn address(&self) -> &str {
        Device::address(self)
    }

    fn has_device_info(&self) -> bool {
        Device::has_device_info(self)
    }

    async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>> {
        Device::read_characteristic(self, uuid).await
    }

    async fn write_characteristic(&self, uuid: Uuid, data: &[u8]) -> Result<()> {
        Device::write_characteristic(self, uuid, data).await
    }
}

/// Run `release` when `result` is an error, then hand `result` back.
async fn release_on_error<T>(result: Result<T>, release: impl AsyncFnOnce()) -> Result<T> {
    if result.is_err() {
        release().await;
    }
    result
}

/// Disconnect a half-set-up peripheral, logging rather than returning failures.
async fn drop_link(peripheral: &Peripheral) {
    if let Err(e) = peripheral.disconnect().await {
        warn!("Failed to disconnect after setup error: {}", e);
    }
}
