//! Core types for BeeWi bulb state and command arguments.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValidationError};

/// Number of bytes in a status blob read from the read-settings characteristic.
pub const STATUS_LEN: usize = 5;

/// Number of bytes in the Device Information system id.
pub const SYSTEM_ID_LEN: usize = 8;

/// Offset between a level (0-9) and its encoded byte on the wire.
const LEVEL_OFFSET: u8 = 2;

/// Offset between a sequence index (0-4) and its encoded byte on the wire.
const SEQUENCE_OFFSET: u8 = 8;

/// A brightness or white-temperature step.
///
/// The bulb exposes ten steps for both settings, from 0 (dimmest / warmest)
/// to 9 (brightest / coolest). On the wire a step is sent as `level + 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Level(u8);

impl Level {
    /// Lowest step.
    pub const MIN: u8 = 0;
    /// Highest step.
    pub const MAX: u8 = 9;

    /// Create a level, rejecting values above [`Level::MAX`].
    ///
    /// ```
    /// use beewi_types::Level;
    ///
    /// assert_eq!(Level::new(5).unwrap().get(), 5);
    /// assert!(Level::new(10).is_err());
    /// ```
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        Self::checked("level", i64::from(value))
    }

    /// Create a level from any integer, naming the argument in the error.
    pub fn checked(parameter: &'static str, value: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::out_of_range(
                parameter,
                value,
                i64::from(Self::MIN),
                i64::from(Self::MAX),
            ))
        }
    }

    /// The step value (0-9).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The byte sent on the wire for this step.
    #[must_use]
    pub fn encoded(self) -> u8 {
        self.0 + LEVEL_OFFSET
    }

    /// Recover a level from its wire byte.
    #[must_use]
    pub fn from_encoded(byte: u8) -> Option<Self> {
        byte.checked_sub(LEVEL_OFFSET)
            .filter(|v| *v <= Self::MAX)
            .map(Self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of one of the five canned colour sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SequenceIndex(u8);

impl SequenceIndex {
    /// First sequence.
    pub const MIN: u8 = 0;
    /// Last sequence.
    pub const MAX: u8 = 4;

    /// Create a sequence index, rejecting values above [`SequenceIndex::MAX`].
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        Self::checked(i64::from(value))
    }

    /// Create a sequence index from any integer.
    pub fn checked(value: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::out_of_range(
                "sequence",
                value,
                i64::from(Self::MIN),
                i64::from(Self::MAX),
            ))
        }
    }

    /// The index (0-4).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The byte sent on the wire for this sequence.
    #[must_use]
    pub fn encoded(self) -> u8 {
        self.0 + SEQUENCE_OFFSET
    }

    /// Recover an index from its wire byte.
    #[must_use]
    pub fn from_encoded(byte: u8) -> Option<Self> {
        byte.checked_sub(SEQUENCE_OFFSET)
            .filter(|v| *v <= Self::MAX)
            .map(Self)
    }
}

impl fmt::Display for SequenceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// Full-intensity white, the colour the bulb reports after switching to white mode.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a colour from three channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a colour from unchecked integers, rejecting channels outside 0-255.
    ///
    /// ```
    /// use beewi_types::Rgb;
    ///
    /// assert_eq!(Rgb::from_components(255, 0, 128).unwrap(), Rgb::new(255, 0, 128));
    /// assert!(Rgb::from_components(256, 0, 0).is_err());
    /// assert!(Rgb::from_components(0, -1, 0).is_err());
    /// ```
    pub fn from_components(red: i64, green: i64, blue: i64) -> Result<Self, ValidationError> {
        fn channel(parameter: &'static str, value: i64) -> Result<u8, ValidationError> {
            u8::try_from(value)
                .map_err(|_| ValidationError::out_of_range(parameter, value, 0, 255))
        }

        Ok(Self {
            red: channel("red", red)?,
            green: channel("green", green)?,
            blue: channel("blue", blue)?,
        })
    }

    /// The channels as the three payload bytes of a colour command.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl FromStr for Rgb {
    type Err = ValidationError;

    /// Parse `r,g,b` (decimal, whitespace allowed) or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ValidationError::InvalidColor(s.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return Ok(Self::new(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ));
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut values = [0i64; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse::<i64>().map_err(|_| invalid())?;
        }
        Self::from_components(values[0], values[1], values[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.red, self.green, self.blue)
    }
}

/// Power state reported in byte 0 of the status blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PowerState {
    /// Byte 0 is `0x00`.
    Off,
    /// Byte 0 is `0x01`.
    On,
    /// Any other value. The bulb's power state is not guaranteed.
    Unknown(u8),
}

impl From<u8> for PowerState {
    fn from(value: u8) -> Self {
        match value {
            0 => PowerState::Off,
            1 => PowerState::On,
            other => PowerState::Unknown(other),
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::Off => write!(f, "off"),
            PowerState::On => write!(f, "on"),
            PowerState::Unknown(raw) => write!(f, "unknown (0x{:02X})", raw),
        }
    }
}

/// Lighting mode selected by the low nibble of the mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BulbMode {
    /// White light with a colour temperature (nibble 2-11).
    White,
    /// RGB colour or colour sequence (nibble 0-1).
    Color,
    /// Nibble 12-15, not produced by known firmware.
    Unknown,
}

impl fmt::Display for BulbMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulbMode::White => write!(f, "white"),
            BulbMode::Color => write!(f, "color"),
            BulbMode::Unknown => write!(f, "unknown"),
        }
    }
}

/// Snapshot of the bulb's settings, decoded from a 5-byte status blob.
///
/// Byte layout: `[power, mode, red, green, blue]`. The mode byte packs
/// brightness in its high nibble and mode/temperature in its low nibble,
/// both offset by 2.
///
/// Values are immutable; the `with_*`/`as_*` methods return the state the
/// bulb is expected to report after a command has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BulbState {
    /// Power state.
    pub power: PowerState,
    /// White or colour mode.
    pub mode: BulbMode,
    /// Brightness step (0-9), `None` if the nibble is out of range.
    pub brightness: Option<u8>,
    /// White temperature step (0-9), only present in white mode.
    pub temperature: Option<u8>,
    /// Colour channels. Only meaningful in colour mode; see [`BulbState::color`].
    pub rgb: Rgb,
}

impl BulbState {
    /// Decode a status blob.
    ///
    /// Extra trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InsufficientBytes`] if `data` holds fewer than
    /// [`STATUS_LEN`] (5) bytes.
    ///
    /// ```
    /// use beewi_types::{BulbMode, BulbState};
    ///
    /// let state = BulbState::from_bytes(&[0x01, 0x55, 0xFF, 0xFF, 0xFF]).unwrap();
    /// assert!(state.is_on());
    /// assert_eq!(state.mode, BulbMode::White);
    /// assert_eq!(state.temperature, Some(3));
    /// assert_eq!(state.brightness, Some(3));
    /// ```
    #[must_use = "parsing returns a Result that should be handled"]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        use bytes::Buf;

        if data.len() < STATUS_LEN {
            return Err(ParseError::InsufficientBytes {
                expected: STATUS_LEN,
                actual: data.len(),
            });
        }

        let mut buf = data;
        let power = PowerState::from(buf.get_u8());
        let mode_byte = buf.get_u8();
        let red = buf.get_u8();
        let green = buf.get_u8();
        let blue = buf.get_u8();

        let low = mode_byte & 0x0F;
        let high = (mode_byte & 0xF0) >> 4;

        let (mode, temperature) = match low {
            0x2..=0xB => (BulbMode::White, Some(low - LEVEL_OFFSET)),
            0x0..=0x1 => (BulbMode::Color, None),
            _ => (BulbMode::Unknown, None),
        };
        let brightness = Level::from_encoded(high).map(Level::get);

        Ok(Self {
            power,
            mode,
            brightness,
            temperature,
            rgb: Rgb::new(red, green, blue),
        })
    }

    /// Whether the bulb reported itself as on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power == PowerState::On
    }

    /// Whether the bulb is in white (temperature) mode.
    #[must_use]
    pub fn is_white(&self) -> bool {
        self.mode == BulbMode::White
    }

    /// The colour, if the bulb is in colour mode.
    #[must_use]
    pub fn color(&self) -> Option<Rgb> {
        (self.mode == BulbMode::Color).then_some(self.rgb)
    }

    /// State after a power command.
    #[must_use]
    pub fn with_power(self, on: bool) -> Self {
        Self {
            power: if on { PowerState::On } else { PowerState::Off },
            ..self
        }
    }

    /// State after a brightness command.
    #[must_use]
    pub fn with_brightness(self, level: Level) -> Self {
        Self {
            brightness: Some(level.get()),
            ..self
        }
    }

    /// State after a temperature command.
    ///
    /// The bulb ignores temperature outside white mode, so the temperature
    /// is only recorded when already white.
    #[must_use]
    pub fn with_temperature(self, level: Level) -> Self {
        if self.is_white() {
            Self {
                temperature: Some(level.get()),
                ..self
            }
        } else {
            self
        }
    }

    /// State after switching to white mode. The temperature is unknown until
    /// the next read.
    #[must_use]
    pub fn as_white(self) -> Self {
        Self {
            mode: BulbMode::White,
            temperature: None,
            rgb: Rgb::WHITE,
            ..self
        }
    }

    /// State after a colour command.
    #[must_use]
    pub fn as_color(self, rgb: Rgb) -> Self {
        Self {
            mode: BulbMode::Color,
            temperature: None,
            rgb,
            ..self
        }
    }

    /// State after selecting a colour sequence.
    #[must_use]
    pub fn as_sequence(self) -> Self {
        Self {
            mode: BulbMode::Color,
            temperature: None,
            ..self
        }
    }
}

impl fmt::Display for BulbState {
    /// Human-readable settings report.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(value: Option<u8>) -> String {
            value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
        }

        writeln!(f, "       ON/OFF : {}", self.power)?;
        writeln!(f, "  WHITE/COLOR : {}", self.mode)?;
        writeln!(f, "   BRIGHTNESS : {}", opt(self.brightness))?;
        writeln!(f, "  TEMPERATURE : {}", opt(self.temperature))?;
        write!(f, "COLOR (R/G/B) : {}", self.rgb)
    }
}

/// Hardware details read from the Device Information service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HardwareInfo {
    /// MAC address derived from the system id.
    pub mac_address: String,
    /// Model number string.
    pub model_number: String,
    /// Firmware revision string.
    pub firmware_revision: String,
    /// Hardware revision string.
    pub hardware_revision: String,
    /// Software revision string, if the bulb exposes one.
    pub software_revision: Option<String>,
    /// Manufacturer name string.
    pub manufacturer_name: String,
}

impl fmt::Display for HardwareInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MAC Address:       {}", self.mac_address)?;
        writeln!(f, "Model number:      {}", self.model_number)?;
        writeln!(f, "Firmware revision: {}", self.firmware_revision)?;
        writeln!(f, "Hardware revision: {}", self.hardware_revision)?;
        if let Some(software) = &self.software_revision {
            writeln!(f, "Software revision: {}", software)?;
        }
        write!(f, "Manufacturer name: {}", self.manufacturer_name)
    }
}

/// Format a system id as the bulb's MAC address.
///
/// The bulb stores its MAC in bytes `[7, 6, 5, 2, 1, 0]` of the 8-byte
/// system id; bytes 3 and 4 are filler. This ordering is specific to this
/// bulb.
///
/// ```
/// use beewi_types::format_system_id;
///
/// let id = [0x01, 0x02, 0x03, 0xFE, 0xFF, 0x04, 0x05, 0x06];
/// assert_eq!(format_system_id(&id).unwrap(), "06:05:04:03:02:01");
/// ```
pub fn format_system_id(data: &[u8]) -> Result<String, ParseError> {
    if data.len() < SYSTEM_ID_LEN {
        return Err(ParseError::InsufficientBytes {
            expected: SYSTEM_ID_LEN,
            actual: data.len(),
        });
    }

    Ok([7, 6, 5, 2, 1, 0]
        .iter()
        .map(|&i| format!("{:02X}", data[i]))
        .collect::<Vec<_>>()
        .join(":"))
}

/// Decode a Device Information string.
///
/// The bulb appends one terminator byte to every string; it is dropped
/// before UTF-8 decoding.
#[must_use]
pub fn decode_info_string(data: &[u8]) -> String {
    let body = data.split_last().map_or(data, |(_, rest)| rest);
    String::from_utf8_lossy(body).into_owned()
}
