//! Command frames written to the SmartLite settings characteristic.
//!
//! Every frame has the shape `55 <opcode> <payload..> 0D 0A`.

use core::fmt;

use bytes::{BufMut, BytesMut};

use crate::error::{ParseError, ParseResult};
use crate::types::{Level, Rgb, SequenceIndex};

/// First byte of every frame.
pub const HEADER: u8 = 0x55;

/// Last two bytes of every frame.
pub const TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Power on/off.
pub const OP_POWER: u8 = 0x10;
/// White temperature.
pub const OP_TEMPERATURE: u8 = 0x11;
/// Brightness.
pub const OP_BRIGHTNESS: u8 = 0x12;
/// RGB colour.
pub const OP_COLOR: u8 = 0x13;
/// Switch to white mode.
pub const OP_WHITE: u8 = 0x14;
/// Start a canned colour sequence.
pub const OP_SEQUENCE: u8 = 0x17;

/// A single command for the bulb.
///
/// Commands are plain values; encoding allocates a fresh frame each time.
///
/// ```
/// use beewi_types::{Command, Level};
///
/// let frame = Command::Brightness(Level::new(9).unwrap()).encode();
/// assert_eq!(frame, [0x55, 0x12, 0x0B, 0x0D, 0x0A]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch the bulb on.
    TurnOn,
    /// Switch the bulb off.
    TurnOff,
    /// Set the brightness step.
    Brightness(Level),
    /// Set the white temperature step.
    Temperature(Level),
    /// Switch to white mode.
    White,
    /// Set an RGB colour.
    Color(Rgb),
    /// Start one of the canned colour sequences.
    ColorSequence(SequenceIndex),
}

impl Command {
    /// Opcode byte for this command.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        match self {
            Command::TurnOn | Command::TurnOff => OP_POWER,
            Command::Brightness(_) => OP_BRIGHTNESS,
            Command::Temperature(_) => OP_TEMPERATURE,
            Command::White => OP_WHITE,
            Command::Color(_) => OP_COLOR,
            Command::ColorSequence(_) => OP_SEQUENCE,
        }
    }

    fn put_payload(&self, buf: &mut impl BufMut) {
        match self {
            Command::TurnOn => buf.put_u8(0x01),
            Command::TurnOff => buf.put_u8(0x00),
            Command::Brightness(level) | Command::Temperature(level) => {
                buf.put_u8(level.encoded())
            }
            Command::White => buf.put_slice(&Rgb::WHITE.to_bytes()),
            Command::Color(rgb) => buf.put_slice(&rgb.to_bytes()),
            Command::ColorSequence(index) => buf.put_u8(index.encoded()),
        }
    }

    /// Length of the encoded frame in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 + payload_len(self.opcode()) + TERMINATOR.len()
    }

    /// Encode the command into a new frame.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u8(HEADER);
        buf.put_u8(self.opcode());
        self.put_payload(&mut buf);
        buf.put_slice(&TERMINATOR);
        buf.to_vec()
    }

    /// Decode a frame previously produced by [`Command::encode`].
    ///
    /// The white command is accepted with any 3-byte payload.
    pub fn decode(data: &[u8]) -> ParseResult<Self> {
        const MIN_FRAME: usize = 2 + 1 + TERMINATOR.len();

        if data.len() < MIN_FRAME {
            return Err(ParseError::InsufficientBytes {
                expected: MIN_FRAME,
                actual: data.len(),
            });
        }
        if data[0] != HEADER {
            return Err(ParseError::InvalidHeader(data[0]));
        }
        if !data.ends_with(&TERMINATOR) {
            return Err(ParseError::MissingTerminator);
        }

        let opcode = data[1];
        let payload = &data[2..data.len() - TERMINATOR.len()];
        let expected = payload_len(opcode);
        if expected == 0 {
            return Err(ParseError::UnknownOpcode(opcode));
        }
        if payload.len() != expected {
            return Err(ParseError::InvalidValue(format!(
                "opcode 0x{:02X} expects {} payload bytes, got {}",
                opcode,
                expected,
                payload.len()
            )));
        }

        let invalid = |what: &str| {
            ParseError::InvalidValue(format!("{} byte 0x{:02X}", what, payload[0]))
        };

        match opcode {
            OP_POWER => match payload[0] {
                0x00 => Ok(Command::TurnOff),
                0x01 => Ok(Command::TurnOn),
                _ => Err(invalid("power")),
            },
            OP_BRIGHTNESS => Level::from_encoded(payload[0])
                .map(Command::Brightness)
                .ok_or_else(|| invalid("brightness")),
            OP_TEMPERATURE => Level::from_encoded(payload[0])
                .map(Command::Temperature)
                .ok_or_else(|| invalid("temperature")),
            OP_WHITE => Ok(Command::White),
            OP_COLOR => Ok(Command::Color(Rgb::new(payload[0], payload[1], payload[2]))),
            OP_SEQUENCE => SequenceIndex::from_encoded(payload[0])
                .map(Command::ColorSequence)
                .ok_or_else(|| invalid("sequence")),
            other => Err(ParseError::UnknownOpcode(other)),
        }
    }
}

/// Payload length for an opcode, 0 if unknown.
fn payload_len(opcode: u8) -> usize {
    match opcode {
        OP_POWER | OP_BRIGHTNESS | OP_TEMPERATURE | OP_SEQUENCE => 1,
        OP_WHITE | OP_COLOR => 3,
        _ => 0,
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::TurnOn => write!(f, "turn on"),
            Command::TurnOff => write!(f, "turn off"),
            Command::Brightness(level) => write!(f, "brightness {}", level),
            Command::Temperature(level) => write!(f, "temperature {}", level),
            Command::White => write!(f, "white"),
            Command::Color(rgb) => write!(f, "color {}", rgb),
            Command::ColorSequence(index) => write!(f, "color sequence {}", index),
        }
    }
}
