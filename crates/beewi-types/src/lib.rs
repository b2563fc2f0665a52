//! Platform-agnostic types for BeeWi SmartLite Bluetooth bulbs.
//!
//! This crate holds everything about the bulb's wire protocol that does
//! not need a Bluetooth stack, so it can be tested and reused on its own.
//!
//! # Features
//!
//! - Command frames and their encoding
//! - Status blob and hardware info decoding
//! - Range-checked argument types
//! - UUID constants for BLE services and characteristics
//!
//! # Example
//!
//! ```
//! use beewi_types::{BulbState, Command, Rgb};
//!
//! let frame = Command::Color(Rgb::new(255, 0, 0)).encode();
//! assert_eq!(frame, [0x55, 0x13, 0xFF, 0x00, 0x00, 0x0D, 0x0A]);
//!
//! let state = BulbState::from_bytes(&[0x00, 0x20, 0x10, 0x20, 0x30]).unwrap();
//! assert!(!state.is_on());
//! assert_eq!(state.color(), Some(Rgb::new(0x10, 0x20, 0x30)));
//! ```

pub mod command;
pub mod error;
pub mod types;
pub mod uuid;

pub use command::Command;
pub use error::{ParseError, ParseResult, ValidationError};
pub use types::{
    BulbMode, BulbState, HardwareInfo, Level, PowerState, Rgb, STATUS_LEN, SequenceIndex,
    decode_info_string, format_system_id,
};
pub use uuid as uuids;

#[cfg(test)]
mod tests {
    use super::*;

    fn level(v: u8) -> Level {
        Level::new(v).unwrap()
    }

    // --- Command encoding tests ---

    #[test]
    fn test_encode_power() {
        assert_eq!(Command::TurnOn.encode(), [0x55, 0x10, 0x01, 0x0D, 0x0A]);
        assert_eq!(Command::TurnOff.encode(), [0x55, 0x10, 0x00, 0x0D, 0x0A]);
    }

    #[test]
    fn test_encode_brightness_bounds() {
        assert_eq!(
            Command::Brightness(level(0)).encode(),
            [0x55, 0x12, 0x02, 0x0D, 0x0A]
        );
        assert_eq!(
            Command::Brightness(level(9)).encode(),
            [0x55, 0x12, 0x0B, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_encode_temperature() {
        assert_eq!(
            Command::Temperature(level(4)).encode(),
            [0x55, 0x11, 0x06, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_encode_white() {
        assert_eq!(
            Command::White.encode(),
            [0x55, 0x14, 0xFF, 0xFF, 0xFF, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_encode_color() {
        assert_eq!(
            Command::Color(Rgb::new(0x12, 0x34, 0x56)).encode(),
            [0x55, 0x13, 0x12, 0x34, 0x56, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_encode_sequences() {
        for (index, byte) in (0..=4u8).zip(0x08..=0x0Cu8) {
            let cmd = Command::ColorSequence(SequenceIndex::new(index).unwrap());
            assert_eq!(cmd.encode(), [0x55, 0x17, byte, 0x0D, 0x0A]);
        }
    }

    #[test]
    fn test_consecutive_colors_do_not_share_state() {
        let red = Command::Color(Rgb::new(255, 0, 0)).encode();
        let blue = Command::Color(Rgb::new(0, 0, 255)).encode();
        assert_eq!(red[2..5], [255, 0, 0]);
        assert_eq!(blue[2..5], [0, 0, 255]);
    }

    #[test]
    fn test_encoded_len_matches_frame() {
        let commands = [
            Command::TurnOn,
            Command::White,
            Command::Color(Rgb::new(1, 2, 3)),
            Command::Brightness(level(3)),
        ];
        for cmd in commands {
            assert_eq!(cmd.encode().len(), cmd.encoded_len(), "{}", cmd);
        }
    }

    // --- Command decoding tests ---

    #[test]
    fn test_decode_rejects_bad_header() {
        let err = Command::decode(&[0x54, 0x10, 0x01, 0x0D, 0x0A]).unwrap_err();
        assert_eq!(err, ParseError::InvalidHeader(0x54));
    }

    #[test]
    fn test_decode_rejects_missing_terminator() {
        let err = Command::decode(&[0x55, 0x10, 0x01, 0x0D, 0x00]).unwrap_err();
        assert_eq!(err, ParseError::MissingTerminator);
    }

    #[test]
    fn test_decode_rejects_unknown_opcode() {
        let err = Command::decode(&[0x55, 0x20, 0x01, 0x0D, 0x0A]).unwrap_err();
        assert_eq!(err, ParseError::UnknownOpcode(0x20));
    }

    #[test]
    fn test_decode_rejects_wrong_payload_length() {
        let err = Command::decode(&[0x55, 0x13, 0x01, 0x0D, 0x0A]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue(_)));
    }

    #[test]
    fn test_decode_rejects_out_of_range_brightness() {
        let err = Command::decode(&[0x55, 0x12, 0x0C, 0x0D, 0x0A]).unwrap_err();
        assert!(err.to_string().contains("brightness"));
    }

    #[test]
    fn test_decode_short_frame() {
        let err = Command::decode(&[0x55, 0x10]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InsufficientBytes {
                expected: 5,
                actual: 2
            }
        );
    }

    // --- Status decoding tests ---

    #[test]
    fn test_status_white_mode() {
        let state = BulbState::from_bytes(&[0x01, 0x55, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(state.power, PowerState::On);
        assert_eq!(state.mode, BulbMode::White);
        assert_eq!(state.temperature, Some(3));
        assert_eq!(state.brightness, Some(3));
        assert_eq!(state.color(), None);
    }

    #[test]
    fn test_status_color_mode() {
        let state = BulbState::from_bytes(&[0x00, 0x20, 0x10, 0x20, 0x30]).unwrap();
        assert_eq!(state.power, PowerState::Off);
        assert_eq!(state.mode, BulbMode::Color);
        assert_eq!(state.temperature, None);
        assert_eq!(state.brightness, Some(0));
        assert_eq!(state.rgb, Rgb::new(0x10, 0x20, 0x30));
    }

    #[test]
    fn test_status_extremes() {
        let state = BulbState::from_bytes(&[0x01, 0xBB, 0, 0, 0]).unwrap();
        assert_eq!(state.brightness, Some(9));
        assert_eq!(state.temperature, Some(9));
    }

    #[test]
    fn test_status_unknown_values() {
        let state = BulbState::from_bytes(&[0x07, 0xFC, 0, 0, 0]).unwrap();
        assert_eq!(state.power, PowerState::Unknown(7));
        assert_eq!(state.mode, BulbMode::Unknown);
        assert_eq!(state.brightness, None);
        assert!(!state.is_on());
    }

    #[test]
    fn test_status_too_short() {
        let err = BulbState::from_bytes(&[0x01, 0x55, 0xFF]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InsufficientBytes {
                expected: 5,
                actual: 3
            }
        );
    }

    #[test]
    fn test_status_extra_bytes_ignored() {
        let state = BulbState::from_bytes(&[0x01, 0x55, 1, 2, 3, 0xAA, 0xBB]).unwrap();
        assert_eq!(state.rgb, Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_status_display() {
        let state = BulbState::from_bytes(&[0x00, 0x21, 0x10, 0x20, 0x30]).unwrap();
        let text = state.to_string();
        assert!(text.contains("ON/OFF : off"));
        assert!(text.contains("WHITE/COLOR : color"));
        assert!(text.contains("TEMPERATURE : N/A"));
        assert!(text.contains("COLOR (R/G/B) : 16 32 48"));
    }

    // --- State transition tests ---

    #[test]
    fn test_transitions_leave_original_untouched() {
        let before = BulbState::from_bytes(&[0x00, 0x55, 0xFF, 0xFF, 0xFF]).unwrap();
        let after = before.with_power(true).with_brightness(level(8));
        assert!(!before.is_on());
        assert_eq!(before.brightness, Some(3));
        assert!(after.is_on());
        assert_eq!(after.brightness, Some(8));
    }

    #[test]
    fn test_temperature_only_applies_in_white_mode() {
        let white = BulbState::from_bytes(&[0x01, 0x55, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(white.with_temperature(level(7)).temperature, Some(7));

        let color = BulbState::from_bytes(&[0x01, 0x50, 1, 2, 3]).unwrap();
        assert_eq!(color.with_temperature(level(7)), color);
    }

    #[test]
    fn test_as_color_and_as_white() {
        let white = BulbState::from_bytes(&[0x01, 0x55, 0xFF, 0xFF, 0xFF]).unwrap();
        let red = white.as_color(Rgb::new(255, 0, 0));
        assert_eq!(red.mode, BulbMode::Color);
        assert_eq!(red.temperature, None);
        assert_eq!(red.color(), Some(Rgb::new(255, 0, 0)));

        let back = red.as_white();
        assert!(back.is_white());
        assert_eq!(back.rgb, Rgb::WHITE);
        assert_eq!(back.brightness, Some(3));
    }

    // --- Argument validation tests ---

    #[test]
    fn test_level_range() {
        assert!(Level::new(0).is_ok());
        assert!(Level::new(9).is_ok());
        assert!(Level::new(10).is_err());
        let err = Level::checked("brightness", -1).unwrap_err();
        assert_eq!(err.to_string(), "brightness must be between 0 and 9, got -1");
    }

    #[test]
    fn test_sequence_range() {
        assert!(SequenceIndex::new(4).is_ok());
        assert!(SequenceIndex::new(5).is_err());
        assert!(SequenceIndex::checked(-1).is_err());
    }

    #[test]
    fn test_rgb_from_components() {
        assert_eq!(Rgb::from_components(0, 0, 0).unwrap(), Rgb::default());
        let err = Rgb::from_components(10, 300, 0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                parameter: "green",
                value: 300,
                ..
            }
        ));
    }

    #[test]
    fn test_rgb_from_str() {
        assert_eq!("255,0,128".parse::<Rgb>().unwrap(), Rgb::new(255, 0, 128));
        assert_eq!(" 1, 2 ,3 ".parse::<Rgb>().unwrap(), Rgb::new(1, 2, 3));
        assert_eq!("#FF8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("#ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert!("#FF80".parse::<Rgb>().is_err());
        assert!("1,2".parse::<Rgb>().is_err());
        assert!("red".parse::<Rgb>().is_err());
        assert!(matches!(
            "256,0,0".parse::<Rgb>(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    // --- Hardware info tests ---

    #[test]
    fn test_format_system_id_order() {
        let id = [0xAA, 0xBB, 0xCC, 0x00, 0x00, 0xDD, 0xEE, 0xFF];
        assert_eq!(format_system_id(&id).unwrap(), "FF:EE:DD:CC:BB:AA");
    }

    #[test]
    fn test_format_system_id_too_short() {
        assert!(matches!(
            format_system_id(&[0; 6]),
            Err(ParseError::InsufficientBytes {
                expected: 8,
                actual: 6
            })
        ));
    }

    #[test]
    fn test_decode_info_string_trims_one_byte() {
        assert_eq!(decode_info_string(b"BeeWi SmartLite\0"), "BeeWi SmartLite");
        assert_eq!(decode_info_string(b"1.0.3\n"), "1.0.3");
        assert_eq!(decode_info_string(b"x"), "");
        assert_eq!(decode_info_string(b""), "");
    }

    #[test]
    fn test_hardware_info_display_skips_missing_software() {
        let info = HardwareInfo {
            mac_address: "FF:EE:DD:CC:BB:AA".into(),
            model_number: "BLR1".into(),
            firmware_revision: "1.0".into(),
            hardware_revision: "2.0".into(),
            software_revision: None,
            manufacturer_name: "BeeWi".into(),
        };
        let text = info.to_string();
        assert!(text.contains("MAC Address:       FF:EE:DD:CC:BB:AA"));
        assert!(!text.contains("Software revision"));
    }

    // --- Serialization tests ---

    #[test]
    fn test_state_serialization() {
        let state = BulbState::from_bytes(&[0x01, 0x55, 0xFF, 0xFF, 0xFF]).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"power\":\"on\""));
        assert!(json.contains("\"mode\":\"white\""));
        assert!(json.contains("\"temperature\":3"));

        let back: BulbState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}

/// Property-based tests for the byte-level codecs.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Decoding arbitrary status bytes should never panic.
        #[test]
        fn status_decode_never_panics(data: Vec<u8>) {
            let _ = BulbState::from_bytes(&data);
        }

        /// Decoding arbitrary frames should never panic.
        #[test]
        fn command_decode_never_panics(data: Vec<u8>) {
            let _ = Command::decode(&data);
        }

        /// Brightness and temperature decode back to the requested step.
        #[test]
        fn status_nibbles_map_to_levels(power in 0u8..=1, b in 0u8..=9, t in 0u8..=9) {
            let mode = ((b + 2) << 4) | (t + 2);
            let state = BulbState::from_bytes(&[power, mode, 0xFF, 0xFF, 0xFF]).unwrap();
            prop_assert_eq!(state.brightness, Some(b));
            prop_assert_eq!(state.temperature, Some(t));
            prop_assert_eq!(state.is_on(), power == 1);
        }

        /// Every valid colour decodes to the same command it was encoded from.
        #[test]
        fn color_frames_decode(r: u8, g: u8, b: u8) {
            let cmd = Command::Color(Rgb::new(r, g, b));
            prop_assert_eq!(Command::decode(&cmd.encode()).unwrap(), cmd);
        }

        /// Channel validation accepts exactly 0-255.
        #[test]
        fn rgb_components_validate(v in -1000i64..1000) {
            prop_assert_eq!(Rgb::from_components(v, 0, 0).is_ok(), (0..=255).contains(&v));
        }

        #[test]
        fn level_range_and_encoding(v in -50i64..50) {
            match Level::checked("brightness", v) {
                Ok(level) => {
                    prop_assert!((0..=9).contains(&v));
                    prop_assert_eq!(i64::from(level.encoded()), v + 2);
                }
                Err(_) => prop_assert!(!(0..=9).contains(&v)),
            }
        }

        #[test]
        fn sequence_range_and_encoding(v in -50i64..50) {
            match SequenceIndex::checked(v) {
                Ok(index) => {
                    prop_assert!((0..=4).contains(&v));
                    prop_assert_eq!(i64::from(index.encoded()), v + 8);
                }
                Err(_) => prop_assert!(!(0..=4).contains(&v)),
            }
        }
    }
}
