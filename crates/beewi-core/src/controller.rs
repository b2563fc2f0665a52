//! High-level control of a single bulb.

use tracing::{debug, info, warn};

use beewi_types::uuid::{
    DEVICE_INFO_SERVICE, FIRMWARE_REVISION, HARDWARE_REVISION, MANUFACTURER_NAME, MODEL_NUMBER,
    SMARTLITE_READ_SETTINGS, SMARTLITE_SETTINGS, SOFTWARE_REVISION, SYSTEM_ID,
};
use beewi_types::{
    BulbState, Command, HardwareInfo, Level, ParseError, Rgb, SequenceIndex, decode_info_string,
    format_system_id,
};

use crate::device::{ConnectionConfig, Device};
use crate::error::{Error, Result};
use crate::traits::BulbTransport;

/// Controls one BeeWi bulb over a [`BulbTransport`].
///
/// Every action refreshes the status from the bulb, writes one freshly
/// encoded [`Command`], and returns the [`BulbState`] the bulb is expected
/// to be in afterwards. That state is also kept as [`last_state`](Self::last_state).
///
/// Arguments are validated before any I/O, so a validation error means
/// nothing was read or written.
///
/// # Example
///
/// ```no_run
/// use beewi_core::{BulbController, Rgb};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut bulb = BulbController::connect("AA:BB:CC:DD:EE:FF").await?;
///     bulb.turn_on().await?;
///     bulb.set_color(Rgb::new(255, 64, 0)).await?;
///     println!("{}", bulb.settings().await?);
///     bulb.close().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BulbController<T> {
    transport: T,
    state: Option<BulbState>,
}

impl BulbController<Device> {
    /// Connect to a bulb by MAC address, platform id or name.
    pub async fn connect(identifier: &str) -> Result<Self> {
        Self::connect_with_config(identifier, ConnectionConfig::default()).await
    }

    /// Connect with custom timeouts.
    pub async fn connect_with_config(identifier: &str, config: ConnectionConfig) -> Result<Self> {
        let device = Device::connect_with_config(identifier, config).await?;
        Self::new(device).await
    }
}

impl<T: BulbTransport> BulbController<T> {
    /// Wrap a connected transport and read the initial status.
    ///
    /// If the initial read fails the transport is disconnected before the
    /// error is returned.
    #[tracing::instrument(level = "debug", skip_all, fields(address = %transport.address()))]
    pub async fn new(transport: T) -> Result<Self> {
        let mut controller = Self {
            transport,
            state: None,
        };

        if let Err(e) = controller.read_status().await {
            if let Err(close_err) = controller.transport.disconnect().await {
                warn!("Failed to disconnect bulb after status read error: {}", close_err);
            }
            return Err(e);
        }

        info!("Bulb ready");
        Ok(controller)
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The state recorded by the last read or action, if any.
    pub fn last_state(&self) -> Option<BulbState> {
        self.state
    }

    /// Read and decode the 5-byte status blob.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStatus`] if the bulb returns fewer than 5 bytes.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn read_status(&mut self) -> Result<BulbState> {
        let data = self
            .transport
            .read_characteristic(SMARTLITE_READ_SETTINGS)
            .await?;

        let state = BulbState::from_bytes(&data).map_err(|e| match e {
            ParseError::InsufficientBytes { expected, actual } => {
                Error::InvalidStatus { expected, actual }
            }
            other => Error::from(other),
        })?;

        debug!(?state, "Status read");
        self.state = Some(state);
        Ok(state)
    }

    /// Write one command to the settings characteristic.
    #[tracing::instrument(level = "debug", skip_all, fields(command = %command))]
    pub async fn write_command(&self, command: Command) -> Result<()> {
        let frame = command.encode();
        self.transport
            .write_characteristic(SMARTLITE_SETTINGS, &frame)
            .await
    }

    async fn apply(
        &mut self,
        command: Command,
        transition: impl FnOnce(BulbState) -> BulbState,
    ) -> Result<BulbState> {
        let current = self.read_status().await?;
        self.write_command(command).await?;
        let next = transition(current);
        self.state = Some(next);
        Ok(next)
    }

    /// Switch the bulb on. Always writes, whatever the current state.
    pub async fn turn_on(&mut self) -> Result<BulbState> {
        self.apply(Command::TurnOn, |s| s.with_power(true)).await
    }

    /// Switch the bulb off. Always writes, whatever the current state.
    pub async fn turn_off(&mut self) -> Result<BulbState> {
        self.apply(Command::TurnOff, |s| s.with_power(false)).await
    }

    /// Set the brightness step (0-9).
    pub async fn set_brightness(&mut self, level: u8) -> Result<BulbState> {
        let level = Level::checked("brightness", i64::from(level))?;
        self.apply(Command::Brightness(level), |s| s.with_brightness(level))
            .await
    }

    /// Set the white temperature step (0-9).
    ///
    /// Does not switch to white mode; the bulb only applies it when white.
    pub async fn set_temperature(&mut self, level: u8) -> Result<BulbState> {
        let level = Level::checked("temperature", i64::from(level))?;
        self.apply(Command::Temperature(level), |s| s.with_temperature(level))
            .await
    }

    /// Switch to white mode. Nothing is written if the bulb is already white.
    pub async fn set_white(&mut self) -> Result<BulbState> {
        let current = self.read_status().await?;
        if current.is_white() {
            debug!("Already in white mode, skipping write");
            return Ok(current);
        }

        self.write_command(Command::White).await?;
        let next = current.as_white();
        self.state = Some(next);
        Ok(next)
    }

    /// Set an RGB colour. Use [`Rgb::from_components`] or `str::parse` to
    /// build a validated colour from untrusted input.
    pub async fn set_color(&mut self, rgb: Rgb) -> Result<BulbState> {
        self.apply(Command::Color(rgb), |s| s.as_color(rgb)).await
    }

    /// Start one of the canned colour sequences (0-4).
    pub async fn set_color_sequence(&mut self, index: u8) -> Result<BulbState> {
        let index = SequenceIndex::checked(i64::from(index))?;
        self.apply(Command::ColorSequence(index), BulbState::as_sequence)
            .await
    }

    /// Re-read the bulb's settings.
    ///
    /// The returned state's `Display` impl renders the human-readable report.
    pub async fn settings(&mut self) -> Result<BulbState> {
        self.read_status().await
    }

    /// Read hardware details from the Device Information service.
    ///
    /// # Errors
    ///
    /// - [`Error::CharacteristicNotFound`] if the service is absent.
    /// - [`Error::InvalidData`] if the system id is shorter than 8 bytes.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn hardware_info(&self) -> Result<HardwareInfo> {
        if !self.transport.has_device_info() {
            return Err(Error::characteristic_not_found(
                DEVICE_INFO_SERVICE.to_string(),
                0,
            ));
        }

        let (system_id, model, firmware, hardware, software, manufacturer) = tokio::join!(
            self.transport.read_characteristic(SYSTEM_ID),
            self.transport.read_characteristic(MODEL_NUMBER),
            self.transport.read_characteristic(FIRMWARE_REVISION),
            self.transport.read_characteristic(HARDWARE_REVISION),
            self.transport.read_characteristic(SOFTWARE_REVISION),
            self.transport.read_characteristic(MANUFACTURER_NAME),
        );

        let software_revision = match software {
            Ok(data) => Some(decode_info_string(&data)),
            Err(Error::CharacteristicNotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(HardwareInfo {
            mac_address: format_system_id(&system_id?)?,
            model_number: decode_info_string(&model?),
            firmware_revision: decode_info_string(&firmware?),
            hardware_revision: decode_info_string(&hardware?),
            software_revision,
            manufacturer_name: decode_info_string(&manufacturer?),
        })
    }

    /// Disconnect and release the transport.
    #[tracing::instrument(level = "debug", skip(self), fields(address = %self.transport.address()))]
    pub async fn close(self) -> Result<()> {
        self.transport.disconnect().await
    }

    /// Take the transport back without disconnecting.
    pub fn into_transport(self) -> T {
        self.transport
    }
}
