//! Error types for protocol parsing and argument validation in beewi-types.

use thiserror::Error;

/// Errors that can occur when parsing bytes received from (or destined for)
/// a BeeWi bulb.
///
/// This error type is platform-agnostic and does not include
/// BLE-specific errors (those belong in beewi-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Not enough bytes to decode the value.
    #[error("Insufficient bytes: expected at least {expected}, got {actual}")]
    InsufficientBytes {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },

    /// Command frame does not start with the `0x55` header byte.
    #[error("Invalid command header: 0x{0:02X}")]
    InvalidHeader(u8),

    /// Command frame does not end with `0x0D 0x0A`.
    #[error("Missing command terminator")]
    MissingTerminator,

    /// Opcode is not one the bulb understands.
    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    /// A field holds a value outside its encoded range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors raised when a caller-supplied argument is outside its documented range.
///
/// Validation always happens before any I/O, so a `ValidationError` means
/// nothing was sent to the bulb.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Numeric argument outside its inclusive range.
    #[error("{parameter} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Name of the argument (e.g. "brightness").
        parameter: &'static str,
        /// The rejected value.
        value: i64,
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },

    /// Colour string that is neither `r,g,b` nor `#rrggbb`.
    #[error("Invalid color '{0}': expected 'r,g,b' or '#rrggbb'")]
    InvalidColor(String),
}

impl ValidationError {
    /// Create an out-of-range error.
    pub fn out_of_range(parameter: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            parameter,
            value,
            min,
            max,
        }
    }
}

/// Result type alias using beewi-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
