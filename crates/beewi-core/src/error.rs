//! Error types for beewi-core.
//!
//! Every failure a controller can report falls into one of three classes,
//! exposed through [`Error::kind`]:
//!
//! | Kind | Variants | Meaning |
//! |------|----------|---------|
//! | [`ErrorKind::Validation`] | [`Error::Validation`] | Argument out of range. Nothing was sent. |
//! | [`ErrorKind::Connection`] | [`Error::DeviceNotFound`], [`Error::ConnectionFailed`], [`Error::CharacteristicNotFound`], [`Error::NotConnected`], [`Error::Bluetooth`] | The bulb could not be reached or lacks a required characteristic. |
//! | [`ErrorKind::Protocol`] | [`Error::InvalidStatus`], [`Error::InvalidData`], [`Error::ReadFailed`], [`Error::WriteFailed`], [`Error::Timeout`] | A read or write on an open connection failed or returned malformed data. |
//!
//! Nothing here is retried automatically. Connecting again is up to the caller.

use std::time::Duration;

use thiserror::Error;

use beewi_types::{ParseError, ValidationError};

/// Errors that can occur when talking to a BeeWi bulb.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Argument outside its documented range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bluetooth Low Energy error outside of a specific read or write
    /// (adapter access, scanning).
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Device not found during scan or connection.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// Operation attempted after the connection was closed.
    #[error("Not connected to device")]
    NotConnected,

    /// Required BLE characteristic or service not found on device.
    #[error("Characteristic not found: {uuid} (searched in {service_count} services)")]
    CharacteristicNotFound {
        /// The UUID that was not found.
        uuid: String,
        /// Number of services that were searched.
        service_count: usize,
    },

    /// Connection failed with specific reason.
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        /// The device identifier that failed to connect.
        device_id: Option<String>,
        /// The structured reason for the failure.
        reason: ConnectionFailureReason,
    },

    /// Status blob shorter than the five bytes the bulb always sends.
    #[error("Invalid status: expected {expected} bytes, got {actual}")]
    InvalidStatus {
        /// Expected data size.
        expected: usize,
        /// Actual data size received.
        actual: usize,
    },

    /// Failed to parse data received from device.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Read operation failed.
    #[error("Read failed from characteristic {uuid}: {reason}")]
    ReadFailed {
        /// The characteristic UUID.
        uuid: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Write operation failed.
    #[error("Write failed to characteristic {uuid}: {reason}")]
    WriteFailed {
        /// The characteristic UUID.
        uuid: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Read or write timed out on an open connection.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller passed an out-of-range argument.
    Validation,
    /// The bulb could not be found, connected to, or lacks a characteristic.
    Connection,
    /// A read or write on an open connection failed.
    Protocol,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Connection => write!(f, "connection"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

/// Structured reasons for connection failures.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new reasons
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConnectionFailureReason {
    /// Bluetooth adapter not available or powered off.
    AdapterUnavailable,
    /// Connecting or discovering services timed out.
    Timeout,
    /// Generic BLE error.
    BleError(String),
    /// Other/unknown error.
    Other(String),
}

impl std::fmt::Display for ConnectionFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdapterUnavailable => write!(f, "Bluetooth adapter unavailable"),
            Self::Timeout => write!(f, "connection timed out"),
            Self::BleError(msg) => write!(f, "BLE error: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Reason why a device was not found.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new reasons
/// in future versions without breaking downstream code.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// Device with specified name/address not found.
    NotFound { identifier: String },
    /// No Bluetooth adapter available.
    NoAdapter,
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { identifier } => write!(f, "device '{}' not found", identifier),
            Self::NoAdapter => write!(f, "no Bluetooth adapter available"),
        }
    }
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Bluetooth(_)
            | Self::DeviceNotFound(_)
            | Self::NotConnected
            | Self::CharacteristicNotFound { .. }
            | Self::ConnectionFailed { .. } => ErrorKind::Connection,
            Self::InvalidStatus { .. }
            | Self::InvalidData(_)
            | Self::ReadFailed { .. }
            | Self::WriteFailed { .. }
            | Self::Timeout { .. } => ErrorKind::Protocol,
        }
    }

    /// Create a device not found error for a specific identifier.
    pub fn device_not_found(identifier: impl Into<String>) -> Self {
        Self::DeviceNotFound(DeviceNotFoundReason::NotFound {
            identifier: identifier.into(),
        })
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a characteristic not found error.
    pub fn characteristic_not_found(uuid: impl Into<String>, service_count: usize) -> Self {
        Self::CharacteristicNotFound {
            uuid: uuid.into(),
            service_count,
        }
    }

    /// Create a connection failure with structured reason.
    pub fn connection_failed(device_id: Option<String>, reason: ConnectionFailureReason) -> Self {
        Self::ConnectionFailed { device_id, reason }
    }

    /// Create a read failure.
    pub fn read_failed(uuid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            uuid: uuid.into(),
            reason: reason.into(),
        }
    }

    /// Create a write failure.
    pub fn write_failed(uuid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            uuid: uuid.into(),
            reason: reason.into(),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::InvalidData(err.to_string())
    }
}

/// Result type alias using beewi-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::device_not_found("AA:BB:CC:DD:EE:FF");
        assert!(err.to_string().contains("AA:BB:CC:DD:EE:FF"));

        let err = Error::NotConnected;
        assert_eq!(err.to_string(), "Not connected to device");

        let err = Error::characteristic_not_found("a8b3fff1", 3);
        assert!(err.to_string().contains("a8b3fff1"));
        assert!(err.to_string().contains("3 services"));

        let err = Error::InvalidStatus {
            expected: 5,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Invalid status: expected 5 bytes, got 2");

        let err = Error::timeout("read characteristic", Duration::from_secs(10));
        assert!(err.to_string().contains("10s"));
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: Error = ValidationError::out_of_range("brightness", 12, 0, 9).into();
        assert_eq!(err.to_string(), "brightness must be between 0 and 9, got 12");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::NotConnected.kind(), ErrorKind::Connection);
        assert_eq!(
            Error::device_not_found("bulb").kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            Error::connection_failed(None, ConnectionFailureReason::Timeout).kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            Error::characteristic_not_found("x", 0).kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            Error::InvalidStatus {
                expected: 5,
                actual: 0
            }
            .kind(),
            ErrorKind::Protocol
        );
        assert_eq!(Error::write_failed("x", "gone").kind(), ErrorKind::Protocol);
        assert_eq!(Error::read_failed("x", "gone").kind(), ErrorKind::Protocol);
        assert_eq!(
            Error::timeout("write", Duration::from_secs(1)).kind(),
            ErrorKind::Protocol
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: Error = ParseError::InsufficientBytes {
            expected: 8,
            actual: 6,
        }
        .into();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("expected at least 8"));
    }

    #[test]
    fn test_device_not_found_reasons() {
        let err = Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter);
        assert!(err.to_string().contains("no Bluetooth adapter"));
    }

    #[test]
    fn test_btleplug_error_conversion() {
        fn _assert_from_impl<T: From<btleplug::Error>>() {}
        _assert_from_impl::<Error>();
    }
}
