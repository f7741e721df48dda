//! Reusable field rules.
//!
//! Every rule takes the raw submitted string and the message to report, and returns the
//! cleaned value or that message. Values are trimmed before any rule looks at them.

use lettre::Address;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const STRONG_PASSWORD_MIN_LENGTH: usize = 12;

type RuleResult<T> = std::result::Result<T, String>;

/// Non-empty after trimming.
pub fn required(value: &str, message: &str) -> RuleResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(message.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Required, and at least `min` characters long.
pub fn min_chars(value: &str, min: usize, message: &str) -> RuleResult<String> {
    let trimmed = required(value, message)?;
    if trimmed.chars().count() < min {
        Err(message.to_string())
    } else {
        Ok(trimmed)
    }
}

/// At most `max` characters long. Empty values pass.
pub fn max_chars(value: &str, max: usize, message: &str) -> RuleResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        Err(message.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// ASCII letters and digits only.
pub fn alphanumeric(value: &str, message: &str) -> RuleResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(trimmed.to_string())
    } else {
        Err(message.to_string())
    }
}

/// Exactly four ASCII digits.
pub fn four_digit_year(value: &str, message: &str) -> RuleResult<String> {
    let trimmed = value.trim();
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        Ok(trimmed.to_string())
    } else {
        Err(message.to_string())
    }
}

/// A decimal number no smaller than `min`.
pub fn decimal_min(value: &str, min: Decimal, message: &str) -> RuleResult<Decimal> {
    Decimal::from_str(value.trim())
        .ok()
        .filter(|n| *n >= min)
        .ok_or_else(|| message.to_string())
}

/// At most `places` digits after the decimal point, ignoring trailing zeros.
pub fn max_scale(value: Decimal, places: u32, message: &str) -> RuleResult<Decimal> {
    if value.normalize().scale() <= places {
        Ok(value)
    } else {
        Err(message.to_string())
    }
}

/// An integer no smaller than `min`.
pub fn int_min(value: &str, min: i32, message: &str) -> RuleResult<i32> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|n| *n >= min)
        .ok_or_else(|| message.to_string())
}

/// Any integer.
pub fn int(value: &str, message: &str) -> RuleResult<i32> {
    int_min(value, i32::MIN, message)
}

/// Blank means "not supplied"; anything else must pass `rule`.
pub fn optional<T>(value: &str, rule: impl FnOnce(&str) -> RuleResult<T>) -> RuleResult<Option<T>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        rule(value).map(Some)
    }
}

/// A syntactically valid address, lowercased.
pub fn email(value: &str, message: &str) -> RuleResult<String> {
    Address::from_str(value.trim())
        .map(|address| address.to_string().to_lowercase())
        .map_err(|_| message.to_string())
}

/// Whether a password satisfies the strength policy: long enough, with at least one
/// lowercase letter, uppercase letter, digit, and symbol.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= STRONG_PASSWORD_MIN_LENGTH
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}

pub fn strong_password(value: &str, message: &str) -> RuleResult<String> {
    let trimmed = value.trim();
    if is_strong_password(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  Sport ", "msg"), Ok("Sport".to_string()));
        assert_eq!(required("   ", "msg"), Err("msg".to_string()));
    }

    #[test]
    fn test_length_rules_count_characters() {
        assert!(min_chars("ab", 2, "msg").is_ok());
        assert!(min_chars("a", 2, "msg").is_err());
        assert!(min_chars("é", 1, "msg").is_ok());
        assert!(max_chars(&"x".repeat(50), 50, "msg").is_ok());
        assert!(max_chars(&"x".repeat(51), 50, "msg").is_err());
        assert!(max_chars("", 50, "msg").is_ok());
    }

    #[test]
    fn test_alphanumeric() {
        assert!(alphanumeric("SUV4x4", "msg").is_ok());
        assert!(alphanumeric("Sport Utility", "msg").is_err());
        assert!(alphanumeric("Off-road", "msg").is_err());
    }

    #[test]
    fn test_four_digit_year() {
        assert_eq!(four_digit_year(" 2019 ", "msg"), Ok("2019".to_string()));
        assert!(four_digit_year("19", "msg").is_err());
        assert!(four_digit_year("20190", "msg").is_err());
        assert!(four_digit_year("2o19", "msg").is_err());
    }

    #[test]
    fn test_numeric_rules() {
        assert_eq!(decimal_min("12.50", Decimal::ZERO, "msg"), Ok(Decimal::new(1250, 2)));
        assert!(decimal_min("-1", Decimal::ZERO, "msg").is_err());
        assert!(decimal_min("cheap", Decimal::ZERO, "msg").is_err());
        assert_eq!(max_scale(Decimal::new(1234550, 2), 2, "msg"), Ok(Decimal::new(1234550, 2)));
        assert!(max_scale(Decimal::new(12300, 4), 2, "msg").is_ok());
        assert!(max_scale(Decimal::new(1234, 3), 2, "msg").is_err());
        assert_eq!(int_min("0", 0, "msg"), Ok(0));
        assert!(int_min("1885", 1886, "msg").is_err());
        assert!(int_min("3.5", 0, "msg").is_err());
        assert_eq!(int("-4", "msg"), Ok(-4));
    }

    #[test]
    fn test_optional_skips_blank_values() {
        assert_eq!(optional("", |v| int_min(v, 1, "msg")), Ok(None));
        assert_eq!(optional(" 3 ", |v| int_min(v, 1, "msg")), Ok(Some(3)));
        assert!(optional("0", |v| int_min(v, 1, "msg")).is_err());
    }

    #[test]
    fn test_email_is_lowercased() {
        assert_eq!(email(" Driver@Example.COM ", "msg"), Ok("driver@example.com".to_string()));
        assert!(email("not-an-email", "msg").is_err());
        assert!(email("", "msg").is_err());
    }

    #[test]
    fn test_strong_password_policy() {
        assert!(is_strong_password("Sup3rSecret!!"));
        // 11 characters
        assert!(!is_strong_password("Sup3rSecre!"));
        // exactly 12 characters
        assert!(is_strong_password("Sup3rSecret!"));
        assert!(!is_strong_password("sup3rsecret!!"));
        assert!(!is_strong_password("SUP3RSECRET!!"));
        assert!(!is_strong_password("SuperSecret!!"));
        assert!(!is_strong_password("Sup3rSecret12"));
    }
}
