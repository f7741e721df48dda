//! The shared minijinja environment.
//!
//! Templates are read from [`Templates`] on first use and cached by the environment.
//! `.html` templates are auto-escaped.

use minijinja::{Environment, ErrorKind, Value};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::static_assets::Templates;

static ENVIRONMENT: Lazy<Environment<'static>> = Lazy::new(build_environment);

fn build_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(|name| match Templates::get(name) {
        Some(file) => String::from_utf8(file.data.into_owned())
            .map(Some)
            .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, format!("template {name} is not UTF-8: {e}"))),
        None => Ok(None),
    });
    env.add_filter("price", price);
    env.add_filter("miles", miles);
    env
}

/// Render a template with the given context.
pub fn render(name: &str, context: Value) -> Result<String, minijinja::Error> {
    ENVIRONMENT.get_template(name)?.render(context)
}

/// Insert thousands separators into a run of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// `28045` -> `$28,045`; cents are shown only when present.
fn price(value: Value) -> Result<String, minijinja::Error> {
    let amount = Decimal::from_str(&value.to_string())
        .map_err(|_| minijinja::Error::new(ErrorKind::InvalidOperation, format!("not a price: {value}")))?
        .round_dp(2);
    let whole = amount.trunc().abs().to_string();
    let cents = (amount.fract().abs() * Decimal::from(100)).trunc();
    let cents_text = cents.to_string();
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };

    if cents.is_zero() {
        Ok(format!("{sign}${}", group_thousands(&whole)))
    } else {
        Ok(format!("{sign}${}.{cents_text:0>2}", group_thousands(&whole)))
    }
}

/// `41205` -> `41,205`
fn miles(value: Value) -> Result<String, minijinja::Error> {
    let n = i64::try_from(value.clone())
        .map_err(|_| minijinja::Error::new(ErrorKind::InvalidOperation, format!("not a mileage: {value}")))?;
    let grouped = group_thousands(&n.unsigned_abs().to_string());
    Ok(if n < 0 { format!("-{grouped}") } else { grouped })
}
