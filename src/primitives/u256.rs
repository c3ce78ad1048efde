//! 256-bit unsigned token amounts and unit conversion helpers.

use crate::utils::serde_helpers::serde_via_str;
use thiserror::Error;

#[allow(
    clippy::assign_op_pattern,
    clippy::ptr_offset_with_cast,
    clippy::manual_range_contains,
    clippy::range_plus_one,
    clippy::transmute_ptr_to_ptr,
    clippy::reversed_empty_ranges,
    clippy::manual_div_ceil
)]
mod macro_code {
    uint::construct_uint! {
        /// 256-bit unsigned integer, the width of an ERC20 amount.
        pub struct U256(4);
    }
}

pub use macro_code::U256;

// Decimal on the wire; `U256::from_str` is hex, so parse explicitly.
serde_via_str!(U256, U256::from_dec_str);

/// Decimals used by every token on the devnet.
pub const ETHER_DECIMALS: u32 = 18;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid digit in amount {0:?}")]
    InvalidDigit(String),
    #[error("amount {0:?} has more than {1} fractional digits")]
    TooPrecise(String, u32),
    #[error("amount {0:?} does not fit in 256 bits")]
    Overflow(String),
}

/// `ether * 10^18`.
pub fn to_wei(ether: u64) -> U256 {
    U256::from(ether) * U256::exp10(ETHER_DECIMALS as usize)
}

/// `10^exp`, or `None` when it does not fit in 256 bits (`exp >= 78`).
pub fn checked_exp10(exp: u32) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exp))
}

/// Parse a human decimal amount such as `"1.5"` into base units.
pub fn parse_units(s: &str, decimals: u32) -> Result<U256, AmountParseError> {
    let s = s.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(AmountParseError::Empty);
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(AmountParseError::InvalidDigit(s.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(AmountParseError::TooPrecise(s.to_string(), decimals));
    }
    let padded = format!("{}{}{}", whole, frac, "0".repeat(decimals as usize - frac.len()));
    let digits = padded.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|_| AmountParseError::Overflow(s.to_string()))
}

pub fn parse_ether(s: &str) -> Result<U256, AmountParseError> {
    parse_units(s, ETHER_DECIMALS)
}

/// Render base units as a decimal string with trailing zeros trimmed.
pub fn format_units(value: U256, decimals: u32) -> String {
    // every U256 is below 10^78, so a wider scale leaves no whole part
    let (whole, frac) = match checked_exp10(decimals) {
        Some(base) => (value / base, value % base),
        None => (U256::zero(), value),
    };
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wei_conversions() {
        assert_eq!(to_wei(1), U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(parse_ether("1").unwrap(), to_wei(1));
        assert_eq!(parse_ether("0.5").unwrap(), U256::from(500_000_000_000_000_000u64));
        assert_eq!(parse_ether(".25").unwrap(), U256::from(250_000_000_000_000_000u64));
        assert_eq!(parse_ether("0").unwrap(), U256::zero());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_ether(""), Err(AmountParseError::Empty));
        assert!(matches!(parse_ether("1e18"), Err(AmountParseError::InvalidDigit(_))));
        assert!(matches!(parse_units("1.001", 2), Err(AmountParseError::TooPrecise(_, 2))));
        let huge = "9".repeat(90);
        assert!(matches!(parse_units(&huge, 0), Err(AmountParseError::Overflow(_))));
    }

    #[test]
    fn exp10_stops_at_256_bits() {
        assert_eq!(checked_exp10(0), Some(U256::one()));
        assert_eq!(checked_exp10(18), Some(to_wei(1)));
        assert!(checked_exp10(77).is_some());
        assert_eq!(checked_exp10(78), None);
        assert_eq!(checked_exp10(255), None);
        assert_eq!(format_units(U256::from(5u64), 80), format!("0.{}5", "0".repeat(79)));
    }

    #[test]
    fn format_trims_fraction() {
        assert_eq!(format_units(to_wei(2000), ETHER_DECIMALS), "2000");
        assert_eq!(format_units(parse_ether("99.25").unwrap(), ETHER_DECIMALS), "99.25");
        assert_eq!(format_units(U256::from(1u64), ETHER_DECIMALS), "0.000000000000000001");
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let v = to_wei(2000);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"2000000000000000000000\"");
        let back: U256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
