//! Trait abstractions for the link between a controller and a bulb.
//!
//! [`BulbTransport`] is implemented by the real Bluetooth [`Device`](crate::Device)
//! and by [`MockBulb`](crate::MockBulb), so [`BulbController`](crate::BulbController)
//! can be driven without hardware.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Characteristic-level access to a connected bulb.
///
/// # Example
///
/// ```ignore
/// use beewi_core::{BulbTransport, Result};
/// use beewi_core::uuid::SMARTLITE_READ_SETTINGS;
///
/// async fn raw_status<T: BulbTransport>(transport: &T) -> Result<Vec<u8>> {
///     transport.read_characteristic(SMARTLITE_READ_SETTINGS).await
/// }
/// ```
#[async_trait]
pub trait BulbTransport: Send + Sync {
    // --- Connection Management ---

    /// Check if the transport is connected.
    async fn is_connected(&self) -> bool;

    /// Disconnect from the bulb.
    async fn disconnect(&self) -> Result<()>;

    // --- Device Identity ---

    /// Get the advertised name, if available.
    fn name(&self) -> Option<&str>;

    /// Get the device address or identifier.
    ///
    /// On Linux/Windows this is typically the MAC address.
    /// On macOS this is a UUID since MAC addresses are not exposed.
    fn address(&self) -> &str;

    /// Whether the Device Information service was found on connect.
    fn has_device_info(&self) -> bool;

    // --- Characteristics ---

    /// Read a characteristic value.
    async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>>;

    /// Write a value to a characteristic, waiting for the response.
    async fn write_characteristic(&self, uuid: Uuid, data: &[u8]) -> Result<()>;
}

#[async_trait]
impl<T: BulbTransport + ?Sized> BulbTransport for Arc<T> {
    async fn is_connected(&self) -> bool {
        (**self).is_connected().await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn address(&self) -> &str {
        (**self).address()
    }

    fn has_device_info(&self) -> bool {
        (**self).has_device_info()
    }

    async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>> {
        (**self).read_characteristic(uuid).await
    }

    async fn write_characteristic(&self, uuid: Uuid, data: &[u8]) -> Result<()> {
        (**self).write_characteristic(uuid, data).await
    }
}
