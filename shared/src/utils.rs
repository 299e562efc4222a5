//! # Shared Utility Functions
//!
//! Helpers used by both the dApp core and the browser frontend.
//!
//! ## Address Formatting
//!
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `0x1234...abcd` form used in the navbar
//!
//! ## Hex Quantities
//!
//! Providers report chain ids as `0x`-prefixed hexadecimal quantities:
//! - [`parse_hex_quantity`] - `"0x5aff"` → `23295`
//! - [`to_hex_quantity`] - `23295` → `"0x5aff"`
//!
//! ```rust
//! use shared::utils::{parse_hex_quantity, to_hex_quantity};
//!
//! assert_eq!(parse_hex_quantity("0x5AFF"), Some(23295));
//! assert_eq!(to_hex_quantity(23295), "0x5aff");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x6eed2f58ed21a651ccc42af123e243fabad920e0";
/// assert_eq!(format_address(addr, 6, 4), "0x6eed...20e0");
/// assert_eq!(format_address("0x12", 6, 4), "0x12");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len || !address.is_ascii() {
        return address.to_string();
    }

    // ASCII only, so byte offsets are char boundaries
    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// `0x` plus four hex digits, an ellipsis, then the last four digits.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// assert_eq!(truncate_address("0x6eed2f58ed21a651ccc42af123e243fabad920e0"), "0x6eed...20e0");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Parse a `0x`-prefixed hexadecimal quantity.
///
/// Returns `None` for a missing prefix, no digits, non-hex characters or a value
/// that does not fit in `u64`.
pub fn parse_hex_quantity(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    u64::from_str_radix(digits, 16).ok()
}

/// Encode a quantity as lowercase `0x`-prefixed hex without leading zeros.
pub fn to_hex_quantity(value: u64) -> String {
    format!("{:#x}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let addr = "0xabc0000000000000000000000000000000000123";
        assert_eq!(format_address(addr, 6, 4), "0xabc0...0123");
        assert_eq!(format_address(addr, 2, 2), "0x...23");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("short", 4, 4), "short");
        assert_eq!(format_address("0x123456789", 6, 4), "0x123456789");
    }

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(parse_hex_quantity("0x5aff"), Some(23295));
        assert_eq!(parse_hex_quantity("0X5AFF"), Some(23295));
        assert_eq!(parse_hex_quantity(" 0x1 "), Some(1));
        assert_eq!(parse_hex_quantity("0x0"), Some(0));
    }

    #[test]
    fn test_parse_hex_quantity_rejects_garbage() {
        assert_eq!(parse_hex_quantity("5aff"), None);
        assert_eq!(parse_hex_quantity("0x"), None);
        assert_eq!(parse_hex_quantity("0x+1"), None);
        assert_eq!(parse_hex_quantity("0xzz"), None);
        assert_eq!(parse_hex_quantity("0x1ffffffffffffffff"), None);
    }

    #[test]
    fn test_to_hex_quantity() {
        assert_eq!(to_hex_quantity(23295), "0x5aff");
        assert_eq!(to_hex_quantity(0), "0x0");
        assert_eq!(parse_hex_quantity(&to_hex_quantity(u64::MAX)), Some(u64::MAX));
    }
}
