//! Mock bulb implementation for testing.
//!
//! [`MockBulb`] implements [`BulbTransport`] and behaves like a SmartLite
//! bulb: every frame written to the settings characteristic is decoded and
//! applied to an in-memory state, and the read-settings characteristic
//! returns that state as a status blob.
//!
//! # Features
//!
//! - **Write log**: every frame written is recorded for assertions
//! - **Failure injection**: make reads and writes fail
//! - **Raw status override**: return arbitrary (including short) status bytes

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use beewi_types::uuid::{
    FIRMWARE_REVISION, HARDWARE_REVISION, MANUFACTURER_NAME, MODEL_NUMBER,
    SMARTLITE_READ_SETTINGS, SMARTLITE_SETTINGS, SOFTWARE_REVISION, SYSTEM_ID,
};
use beewi_types::{Command, Rgb};

use crate::error::{Error, Result};
use crate::traits::BulbTransport;

/// Byte the bulb appends to every Device Information string.
const INFO_TERMINATOR: u8 = 0x00;

/// Settings held by the emulated bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MockState {
    on: bool,
    brightness: u8,
    white: bool,
    temperature: u8,
    rgb: Rgb,
}

impl MockState {
    fn status_bytes(&self) -> Vec<u8> {
        let low = if self.white { self.temperature + 2 } else { 0 };
        let mode = ((self.brightness + 2) << 4) | low;
        vec![
            u8::from(self.on),
            mode,
            self.rgb.red,
            self.rgb.green,
            self.rgb.blue,
        ]
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::TurnOn => self.on = true,
            Command::TurnOff => self.on = false,
            Command::Brightness(level) => self.brightness = level.get(),
            Command::Temperature(level) => self.temperature = level.get(),
            Command::White => {
                self.white = true;
                self.rgb = Rgb::WHITE;
            }
            Command::Color(rgb) => {
                self.white = false;
                self.rgb = rgb;
            }
            Command::ColorSequence(_) => self.white = false,
        }
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            on: true,
            brightness: 9,
            white: true,
            temperature: 5,
            rgb: Rgb::WHITE,
        }
    }
}

/// Device Information values served by the mock.
#[derive(Debug, Clone)]
struct MockHardware {
    system_id: Vec<u8>,
    model_number: String,
    firmware_revision: String,
    hardware_revision: String,
    software_revision: Option<String>,
    manufacturer_name: String,
}

impl Default for MockHardware {
    fn default() -> Self {
        Self {
            system_id: vec![0x66, 0x55, 0x44, 0x00, 0x00, 0x33, 0x22, 0x11],
            model_number: "BLR07".to_string(),
            firmware_revision: "1.0.3".to_string(),
            hardware_revision: "2.0".to_string(),
            software_revision: None,
            manufacturer_name: "BeeWi".to_string(),
        }
    }
}

/// A mock BeeWi bulb for testing.
///
/// # Example
///
/// ```
/// use beewi_core::{BulbController, MockBulbBuilder};
///
/// #[tokio::main]
/// async fn main() {
///     let mut bulb = BulbController::new(MockBulbBuilder::new().build()).await.unwrap();
///     let state = bulb.turn_off().await.unwrap();
///     assert!(!state.is_on());
/// }
/// ```
pub struct MockBulb {
    name: String,
    address: String,
    connected: AtomicBool,
    has_device_info: bool,
    state: RwLock<MockState>,
    hardware: MockHardware,
    status_override: RwLock<Option<Vec<u8>>>,
    writes: RwLock<Vec<Vec<u8>>>,
    read_count: AtomicU32,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    disconnect_fails: AtomicBool,
}

impl std::fmt::Debug for MockBulb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBulb")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("connected", &self.connected.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockBulb {
    fn default() -> Self {
        MockBulbBuilder::new().build()
    }
}

impl MockBulb {
    /// Create a connected mock bulb in white mode at full brightness.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_connected(&self) -> Result<()> {
        if !self.connected.load(Ordering::Relaxed) {
            Err(Error::NotConnected)
        } else {
            Ok(())
        }
    }

    async fn failure(&self) -> Option<String> {
        if self.should_fail.load(Ordering::Relaxed) {
            Some(self.fail_message.read().await.clone())
        } else {
            None
        }
    }

    async fn read_status(&self) -> Vec<u8> {
        if let Some(raw) = self.status_override.read().await.clone() {
            return raw;
        }
        self.state.read().await.status_bytes()
    }

    fn info_string(value: &str) -> Vec<u8> {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(INFO_TERMINATOR);
        bytes
    }

    fn read_device_info(&self, uuid: Uuid) -> Result<Vec<u8>> {
        let missing = || Error::characteristic_not_found(uuid.to_string(), 1);
        if !self.has_device_info {
            return Err(missing());
        }

        let hw = &self.hardware;
        match uuid {
            u if u == SYSTEM_ID => Ok(hw.system_id.clone()),
            u if u == MODEL_NUMBER => Ok(Self::info_string(&hw.model_number)),
            u if u == FIRMWARE_REVISION => Ok(Self::info_string(&hw.firmware_revision)),
            u if u == HARDWARE_REVISION => Ok(Self::info_string(&hw.hardware_revision)),
            u if u == MANUFACTURER_NAME => Ok(Self::info_string(&hw.manufacturer_name)),
            u if u == SOFTWARE_REVISION => hw
                .software_revision
                .as_deref()
                .map(Self::info_string)
                .ok_or_else(missing),
            _ => Err(missing()),
        }
    }

    // --- Test control methods ---

    /// Make reads and writes fail.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Make `disconnect` fail while leaving the link up.
    pub fn set_disconnect_fails(&self, fail: bool) {
        self.disconnect_fails.store(fail, Ordering::Relaxed);
    }

    /// Return these bytes from the read-settings characteristic instead of
    /// the emulated state. `None` restores normal behaviour.
    pub async fn set_raw_status(&self, raw: Option<Vec<u8>>) {
        *self.status_override.write().await = raw;
    }

    /// All frames written so far, oldest first.
    pub async fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.read().await.clone()
    }

    /// Number of frames written so far.
    pub async fn write_count(&self) -> usize {
        self.writes.read().await.len()
    }

    /// Forget recorded writes.
    pub async fn clear_writes(&self) {
        self.writes.write().await.clear();
    }

    /// Number of status reads performed.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Whether the emulated bulb is on.
    pub async fn is_on(&self) -> bool {
        self.state.read().await.on
    }

    /// The emulated colour channels.
    pub async fn rgb(&self) -> Rgb {
        self.state.read().await.rgb
    }

    /// The emulated status blob.
    pub async fn status_bytes(&self) -> Vec<u8> {
        self.state.read().await.status_bytes()
    }
}

#[async_trait]
impl BulbTransport for MockBulb {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn disconnect(&self) -> Result<()> {
        if self.disconnect_fails.load(Ordering::Relaxed) {
            return Err(Error::InvalidData("Mock disconnect failure".to_string()));
        }
        self.connected.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn has_device_info(&self) -> bool {
        self.has_device_info
    }

    async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>> {
        self.check_connected()?;
        if let Some(reason) = self.failure().await {
            return Err(Error::read_failed(uuid.to_string(), reason));
        }

        if uuid == SMARTLITE_READ_SETTINGS {
            self.read_count.fetch_add(1, Ordering::Relaxed);
            return Ok(self.read_status().await);
        }
        if uuid == SMARTLITE_SETTINGS {
            return Err(Error::read_failed(uuid.to_string(), "characteristic is write-only"));
        }
        self.read_device_info(uuid)
    }

    async fn write_characteristic(&self, uuid: Uuid, data: &[u8]) -> Result<()> {
        self.check_connected()?;
        if let Some(reason) = self.failure().await {
            return Err(Error::write_failed(uuid.to_string(), reason));
        }
        if uuid != SMARTLITE_SETTINGS {
            return Err(Error::write_failed(uuid.to_string(), "characteristic is read-only"));
        }

        self.writes.write().await.push(data.to_vec());
        let command = Command::decode(data)?;
        self.state.write().await.apply(command);
        Ok(())
    }
}

/// Builder for creating mock bulbs with custom settings.
#[derive(Debug, Clone)]
pub struct MockBulbBuilder {
    name: String,
    address: Option<String>,
    auto_connect: bool,
    has_device_info: bool,
    state: MockState,
    hardware: MockHardware,
}

impl Default for MockBulbBuilder {
    fn default() -> Self {
        Self {
            name: "BeeWi SmartLite".to_string(),
            address: None,
            auto_connect: true,
            has_device_info: true,
            state: MockState::default(),
            hardware: MockHardware::default(),
        }
    }
}

impl MockBulbBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the advertised name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the address. A random `MOCK-XXXXXX` address is used otherwise.
    #[must_use]
    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    /// Set whether the bulb starts connected.
    #[must_use]
    pub fn auto_connect(mut self, auto: bool) -> Self {
        self.auto_connect = auto;
        self
    }

    /// Set the initial power state.
    #[must_use]
    pub fn power(mut self, on: bool) -> Self {
        self.state.on = on;
        self
    }

    /// Set the initial brightness step (clamped to 0-9).
    #[must_use]
    pub fn brightness(mut self, level: u8) -> Self {
        self.state.brightness = level.min(9);
        self
    }

    /// Start in white mode with this temperature step (clamped to 0-9).
    #[must_use]
    pub fn white(mut self, temperature: u8) -> Self {
        self.state.white = true;
        self.state.temperature = temperature.min(9);
        self.state.rgb = Rgb::WHITE;
        self
    }

    /// Start in colour mode.
    #[must_use]
    pub fn color(mut self, rgb: Rgb) -> Self {
        self.state.white = false;
        self.state.rgb = rgb;
        self
    }

    /// Set whether the Device Information service is present.
    #[must_use]
    pub fn device_info(mut self, present: bool) -> Self {
        self.has_device_info = present;
        self
    }

    /// Set the raw system id bytes.
    #[must_use]
    pub fn system_id(mut self, bytes: Vec<u8>) -> Self {
        self.hardware.system_id = bytes;
        self
    }

    /// Set the model number string.
    #[must_use]
    pub fn model_number(mut self, model: &str) -> Self {
        self.hardware.model_number = model.to_string();
        self
    }

    /// Set the firmware revision string.
    #[must_use]
    pub fn firmware_revision(mut self, firmware: &str) -> Self {
        self.hardware.firmware_revision = firmware.to_string();
        self
    }

    /// Expose a software revision characteristic.
    #[must_use]
    pub fn software_revision(mut self, software: &str) -> Self {
        self.hardware.software_revision = Some(software.to_string());
        self
    }

    /// Build the mock bulb.
    #[must_use]
    pub fn build(self) -> MockBulb {
        MockBulb {
            name: self.name,
            address: self
                .address
                .unwrap_or_else(|| format!("MOCK-{:06X}", rand::random::<u32>() % 0xFFFFFF)),
            connected: AtomicBool::new(self.auto_connect),
            has_device_info: self.has_device_info,
            state: RwLock::new(self.state),
            hardware: self.hardware,
            status_override: RwLock::new(None),
            writes: RwLock::new(Vec::new()),
            read_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            disconnect_fails: AtomicBool::new(false),
        }
    }
}
