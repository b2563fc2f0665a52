//! Utility functions for beewi-core.

use btleplug::platform::PeripheralId;

/// Address reported by platforms that hide the real MAC (macOS).
pub const PLACEHOLDER_ADDRESS: &str = "00:00:00:00:00:00";

/// Format a peripheral ID as a string.
///
/// On macOS, peripheral IDs are UUIDs. On other platforms, they may be
/// MAC addresses or other formats. This function extracts the useful
/// identifier string.
pub fn format_peripheral_id(id: &PeripheralId) -> String {
    strip_peripheral_id(&format!("{:?}", id)).to_string()
}

fn strip_peripheral_id(debug: &str) -> &str {
    debug
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
}

/// Create an identifier string from an address and peripheral ID.
///
/// On macOS where addresses are 00:00:00:00:00:00, uses the peripheral ID.
/// On other platforms, uses the Bluetooth address.
pub fn create_identifier(address: &str, peripheral_id: &PeripheralId) -> String {
    if is_placeholder_address(address) {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}

/// Whether an address is the all-zero placeholder.
pub fn is_placeholder_address(address: &str) -> bool {
    address == PLACEHOLDER_ADDRESS
}

/// Check whether a peripheral matches a user-supplied identifier.
///
/// `identifier_lower` must already be lowercase. Matches, in order:
/// the platform peripheral id (substring), the MAC address (with or
/// without colons), then the advertised name (substring).
pub fn matches_identifier(
    identifier_lower: &str,
    address: &str,
    peripheral_id: &str,
    name: Option<&str>,
) -> bool {
    if identifier_lower.is_empty() {
        return false;
    }

    if peripheral_id.to_lowercase().contains(identifier_lower) {
        return true;
    }

    let address = address.to_lowercase();
    if !is_placeholder_address(&address)
        && (address == identifier_lower
            || address.replace(':', "") == identifier_lower.replace(':', ""))
    {
        return true;
    }

    name.is_some_and(|n| n.to_lowercase().contains(identifier_lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_peripheral_id() {
        assert_eq!(
            strip_peripheral_id("PeripheralId(AA:BB:CC:DD:EE:FF)"),
            "AA:BB:CC:DD:EE:FF"
        );
        assert_eq!(strip_peripheral_id("plain"), "plain");
    }

    #[test]
    fn test_placeholder_address() {
        assert!(is_placeholder_address("00:00:00:00:00:00"));
        assert!(!is_placeholder_address("AA:BB:CC:DD:EE:FF"));
    }

    #[test]
    fn test_matches_by_address() {
        assert!(matches_identifier(
            "aa:bb:cc:dd:ee:ff",
            "AA:BB:CC:DD:EE:FF",
            "hci0/dev_AA_BB_CC_DD_EE_FF",
            None
        ));
        assert!(matches_identifier(
            "aabbccddeeff",
            "AA:BB:CC:DD:EE:FF",
            "",
            None
        ));
    }

    #[test]
    fn test_placeholder_address_never_matches() {
        assert!(!matches_identifier(
            "00:00:00:00:00:00",
            "00:00:00:00:00:00",
            "",
            None
        ));
    }

    #[test]
    fn test_matches_by_peripheral_id_and_name() {
        assert!(matches_identifier(
            "5e3c",
            "00:00:00:00:00:00",
            "5E3C1A2B-0000-4000-8000-000000000000",
            None
        ));
        assert!(matches_identifier(
            "smartlite",
            "11:22:33:44:55:66",
            "",
            Some("BeeWi SmartLite")
        ));
        assert!(!matches_identifier(
            "kitchen",
            "11:22:33:44:55:66",
            "",
            Some("BeeWi SmartLite")
        ));
    }

    #[test]
    fn test_empty_identifier_never_matches() {
        assert!(!matches_identifier("", "11:22:33:44:55:66", "x", Some("y")));
    }
}
