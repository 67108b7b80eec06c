//! Input checks applied before a submission creates any record.

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static ETH_ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("address pattern is valid")
});

pub fn is_valid_address(address: &str) -> bool {
    ETH_ADDRESS_RE.is_match(address)
}

/// Parse a user-entered amount. Must be finite and strictly positive.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(ValidationError::InvalidAmount(raw.to_string())),
    }
}

/// Address is kept verbatim (no checksum normalisation).
pub fn validate_address(raw: &str) -> Result<String, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    if !is_valid_address(raw) {
        return Err(ValidationError::InvalidAddress(raw.to_string()));
    }
    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_pattern() {
        assert!(is_valid_address("0x1111111111111111111111111111111111111111"));
        assert!(is_valid_address("0xAbCdEf0123456789abcdef0123456789ABCDEF01"));
        assert!(!is_valid_address("0xZZZ"));
        assert!(!is_valid_address("1111111111111111111111111111111111111111"));
        assert!(!is_valid_address("0x11111111111111111111111111111111111111111"));
        assert!(!is_valid_address(" 0x1111111111111111111111111111111111111111"));
    }

    #[test]
    fn test_validate_address_keeps_casing() {
        let addr = "0xAbCdEf0123456789abcdef0123456789ABCDEF01";
        assert_eq!(validate_address(addr).unwrap(), addr);
        assert_eq!(validate_address(""), Err(ValidationError::MissingAddress));
        assert!(matches!(
            validate_address("0xZZZ"),
            Err(ValidationError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5").unwrap(), 1.5);
        assert_eq!(parse_amount(" 0.000001 ").unwrap(), 0.000001);
        assert_eq!(parse_amount(""), Err(ValidationError::MissingAmount));
        assert!(matches!(parse_amount("0"), Err(ValidationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-2"), Err(ValidationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("abc"), Err(ValidationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(ValidationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("inf"), Err(ValidationError::InvalidAmount(_))));
    }
}
