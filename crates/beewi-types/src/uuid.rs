//! Bluetooth UUIDs for BeeWi SmartLite bulbs.
//!
//! This module contains all the UUIDs needed to communicate with the bulb
//! over Bluetooth Low Energy.

use uuid::{Uuid, uuid};

// --- SmartLite control service ---

/// SmartLite control service UUID.
pub const SMARTLITE_CONTROL_SERVICE: Uuid = uuid!("a8b3fff0-4834-4051-89d0-3de95cddd318");

/// Write-settings characteristic: every command frame is written here.
pub const SMARTLITE_SETTINGS: Uuid = uuid!("a8b3fff1-4834-4051-89d0-3de95cddd318");

/// Read-settings characteristic: returns the 5-byte status blob.
pub const SMARTLITE_READ_SETTINGS: Uuid = uuid!("a8b3fff2-4834-4051-89d0-3de95cddd318");

// --- Standard BLE Service UUIDs ---

/// Device Information service.
pub const DEVICE_INFO_SERVICE: Uuid = uuid!("0000180a-0000-1000-8000-00805f9b34fb");

// --- Device Information Characteristic UUIDs ---

/// System ID characteristic (8 bytes, holds the MAC).
pub const SYSTEM_ID: Uuid = uuid!("00002a23-0000-1000-8000-00805f9b34fb");

/// Model number string characteristic.
pub const MODEL_NUMBER: Uuid = uuid!("00002a24-0000-1000-8000-00805f9b34fb");

/// Firmware revision string characteristic.
pub const FIRMWARE_REVISION: Uuid = uuid!("00002a26-0000-1000-8000-00805f9b34fb");

/// Hardware revision string characteristic.
pub const HARDWARE_REVISION: Uuid = uuid!("00002a27-0000-1000-8000-00805f9b34fb");

/// Software revision string characteristic.
pub const SOFTWARE_REVISION: Uuid = uuid!("00002a28-0000-1000-8000-00805f9b34fb");

/// Manufacturer name string characteristic.
pub const MANUFACTURER_NAME: Uuid = uuid!("00002a29-0000-1000-8000-00805f9b34fb");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_service_uuid() {
        assert_eq!(
            SMARTLITE_CONTROL_SERVICE.to_string(),
            "a8b3fff0-4834-4051-89d0-3de95cddd318"
        );
    }

    #[test]
    fn test_settings_characteristics() {
        assert_eq!(
            SMARTLITE_SETTINGS.to_string(),
            "a8b3fff1-4834-4051-89d0-3de95cddd318"
        );
        assert_eq!(
            SMARTLITE_READ_SETTINGS.to_string(),
            "a8b3fff2-4834-4051-89d0-3de95cddd318"
        );
        assert_ne!(SMARTLITE_SETTINGS, SMARTLITE_READ_SETTINGS);
    }

    #[test]
    fn test_device_info_service_uuid() {
        assert_eq!(
            DEVICE_INFO_SERVICE.to_string(),
            "0000180a-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_smartlite_uuids_share_base() {
        for uuid in [
            SMARTLITE_CONTROL_SERVICE,
            SMARTLITE_SETTINGS,
            SMARTLITE_READ_SETTINGS,
        ] {
            let s = uuid.to_string();
            assert!(s.starts_with("a8b3fff"), "UUID {} should start with a8b3fff", s);
            assert!(s.ends_with("-4834-4051-89d0-3de95cddd318"));
        }
    }

    #[test]
    fn test_standard_ble_characteristic_prefix() {
        // Standard BLE characteristics use 16-bit UUIDs (start with 00002aXX)
        let standard_uuids = [
            SYSTEM_ID,
            MODEL_NUMBER,
            FIRMWARE_REVISION,
            HARDWARE_REVISION,
            SOFTWARE_REVISION,
            MANUFACTURER_NAME,
        ];

        for uuid in standard_uuids {
            assert!(
                uuid.to_string().starts_with("00002a"),
                "UUID {} should start with 00002a",
                uuid
            );
        }
    }
}
