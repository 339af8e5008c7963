use std::fmt;

use super::constants::ETH_DECIMALS;

/// Wei per ether (10^18)
pub const WEI_PER_ETH: u128 = 10u128.pow(ETH_DECIMALS);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    InvalidDecimal(String),
    TooManyDecimals(String),
    Overflow(String),
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::InvalidDecimal(s) => write!(f, "Invalid decimal amount: '{}'", s),
            UnitError::TooManyDecimals(s) => write!(f, "More than 18 decimal places: '{}'", s),
            UnitError::Overflow(s) => write!(f, "Amount out of range: '{}'", s),
        }
    }
}

/// Parse a decimal ether string into integer wei.
///
/// Exact: every value the contract can hand back through `format_ether`
/// parses to the same integer. Rejects signs, exponents and anything past
/// 18 fractional digits instead of rounding.
pub fn parse_ether(amount: &str) -> Result<u128, UnitError> {
    let amount = amount.trim();
    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(UnitError::InvalidDecimal(amount.to_string()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(UnitError::InvalidDecimal(amount.to_string()));
    }
    if frac_part.len() > ETH_DECIMALS as usize {
        return Err(UnitError::TooManyDecimals(amount.to_string()));
    }

    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| UnitError::Overflow(amount.to_string()))?
    };

    let mut frac_padded = frac_part.to_string();
    while frac_padded.len() < ETH_DECIMALS as usize {
        frac_padded.push('0');
    }
    let frac_value: u128 = frac_padded
        .parse()
        .map_err(|_| UnitError::Overflow(amount.to_string()))?;

    int_value
        .checked_mul(WEI_PER_ETH)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| UnitError::Overflow(amount.to_string()))
}

/// Format integer wei as a decimal ether string.
///
/// Always carries a fractional part ("1.0", not "1") and trims trailing
/// zeros, so the output round-trips through `parse_ether` unchanged.
pub fn format_ether(wei: u128) -> String {
    let int_part = wei / WEI_PER_ETH;
    let frac_part = wei % WEI_PER_ETH;

    if frac_part == 0 {
        return format!("{}.0", int_part);
    }

    let frac = format!("{:0width$}", frac_part, width = ETH_DECIMALS as usize);
    let trimmed = frac.trim_end_matches('0');
    format!("{}.{}", int_part, trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_fractional_amounts() {
        assert_eq!(parse_ether("0.5"), Ok(500_000_000_000_000_000));
        assert_eq!(parse_ether("1"), Ok(WEI_PER_ETH));
        assert_eq!(parse_ether("1.0"), Ok(WEI_PER_ETH));
        assert_eq!(parse_ether(".5"), Ok(500_000_000_000_000_000));
        assert_eq!(parse_ether("0"), Ok(0));
        assert_eq!(parse_ether("0.000000000000000001"), Ok(1));
        assert_eq!(parse_ether("42.069"), Ok(42_069_000_000_000_000_000));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!(parse_ether("abc").is_err());
        assert!(parse_ether("-5").is_err());
        assert!(parse_ether("").is_err());
        assert!(parse_ether(".").is_err());
        assert!(parse_ether("1.2.3").is_err());
        assert!(parse_ether("1e18").is_err());
        // 19 fractional digits would silently lose precision
        assert!(matches!(
            parse_ether("0.1234567890123456789"),
            Err(UnitError::TooManyDecimals(_))
        ));
    }

    #[test]
    fn formats_with_trimmed_fraction() {
        assert_eq!(format_ether(0), "0.0");
        assert_eq!(format_ether(WEI_PER_ETH), "1.0");
        assert_eq!(format_ether(500_000_000_000_000_000), "0.5");
        assert_eq!(format_ether(1), "0.000000000000000001");
        assert_eq!(format_ether(1_230_000_000_000_000_000), "1.23");
    }

    #[test]
    fn round_trips_exactly() {
        let samples: &[u128] = &[
            0,
            1,
            999,
            WEI_PER_ETH - 1,
            WEI_PER_ETH,
            WEI_PER_ETH + 1,
            500_000_000_000_000_000,
            123_456_789_000_000_000_000_000,
            u64::MAX as u128,
            u128::MAX / WEI_PER_ETH * WEI_PER_ETH,
        ];
        for &wei in samples {
            assert_eq!(parse_ether(&format_ether(wei)), Ok(wei), "wei={}", wei);
        }
    }
}
