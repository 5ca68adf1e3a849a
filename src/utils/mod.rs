//! Formatting and parsing helpers for Brazilian-style amounts
//!
//! Output uses `.` for thousands and `,` for decimals ("R$ 1.234,56").
//! Input accepts either `,` or `.` as the decimal separator.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::ScreenerError;

/// Format a price as Brazilian Real: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use screener::utils::format_brl;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_brl(dec!(1234.56)), "R$ 1.234,56");
/// assert_eq!(format_brl(dec!(9.5)), "R$ 9,50");
/// ```
pub fn format_brl(value: Decimal) -> String {
    format!("R$ {}", format_number_br(value))
}

/// Format a number with two decimals and Brazilian separators: "1.234,56"
pub fn format_number_br(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}{},{}", sign, grouped, fraction)
}

/// Format a dividend yield as reported by the quote API (already in percent)
///
/// # Examples
/// ```
/// use screener::utils::format_yield;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_yield(dec!(8.4)), "8,40%");
/// ```
pub fn format_yield(value: Decimal) -> String {
    format!("{}%", format_number_br(value))
}

/// Parse a user-entered price ("12,50", "12.50", "R$ 12,50").
///
/// A comma is the decimal separator when present; dots before it are
/// treated as thousands separators.
pub fn parse_price(input: &str) -> Result<Decimal, ScreenerError> {
    let cleaned = input.trim().trim_start_matches("R$").trim();
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };

    Decimal::from_str(&normalized)
        .map_err(|_| ScreenerError::Validation(format!("'{}' is not a valid price", input.trim())))
}

/// Parse a per-share budget; must be a positive amount
pub fn parse_budget(input: &str) -> Result<Decimal, ScreenerError> {
    let value = parse_price(input)?;
    if value <= Decimal::ZERO {
        return Err(ScreenerError::Validation(format!(
            "budget must be a positive amount, got {}",
            input.trim()
        )));
    }
    Ok(value)
}
