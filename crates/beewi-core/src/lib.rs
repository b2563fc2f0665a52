//! Core BLE library for BeeWi SmartLite bulbs.
//!
//! This crate connects to a bulb over Bluetooth Low Energy and drives it
//! through [`BulbController`]: power, brightness, white temperature, RGB
//! colour, canned colour sequences, status and hardware information.
//!
//! # Features
//!
//! - **Discovery**: scan for nearby bulbs and look one up by address or name
//! - **Control**: one method per bulb command, each returning the new state
//! - **Scoped connections**: [`ControllerGuard`] and [`with_controller`]
//! - **Testing**: [`MockBulb`] emulates a bulb behind the same [`BulbTransport`] trait
//!
//! # Platform Differences
//!
//! - **macOS**: devices are identified by a CoreBluetooth UUID, not by MAC.
//! - **Linux/Windows**: devices are identified by their MAC address.
//!
//! [`BulbController::hardware_info`] always reports the MAC stored in the
//! bulb's system id, whatever the platform.
//!
//! # Quick Start
//!
//! ```no_run
//! use beewi_core::{BulbController, scan};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bulbs = scan::scan_for_bulbs().await?;
//!     println!("Found {} bulbs", bulbs.len());
//!
//!     let mut bulb = BulbController::connect("AA:BB:CC:DD:EE:FF").await?;
//!     bulb.turn_on().await?;
//!     bulb.set_brightness(7).await?;
//!     println!("{}", bulb.settings().await?);
//!     println!("{}", bulb.hardware_info().await?);
//!     bulb.close().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod device;
pub mod error;
pub mod guard;
pub mod mock;
pub mod scan;
pub mod traits;
pub mod util;

pub use beewi_types::types;
pub use beewi_types::uuid;

// Core exports
pub use controller::BulbController;
pub use device::{ConnectionConfig, Device};
pub use error::{ConnectionFailureReason, DeviceNotFoundReason, Error, ErrorKind, Result};
pub use guard::{ControllerGuard, run_scoped, with_controller};
pub use mock::{MockBulb, MockBulbBuilder};
pub use scan::{DiscoveredBulb, FindProgress, ProgressCallback, ScanOptions};
pub use traits::BulbTransport;
pub use util::{create_identifier, format_peripheral_id};

// Re-export from beewi-types
pub use beewi_types::uuid as uuids;
pub use beewi_types::{
    BulbMode, BulbState, Command, HardwareInfo, Level, ParseError, PowerState, Rgb,
    SequenceIndex, ValidationError,
};
