//! Polish number and date formatting for printed invoices.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::is_within_line_limit;

/// Money amount: two decimals, space-grouped thousands, decimal comma.
///
/// `1234.5` → `"1 234,50"`.
pub fn format_amount(value: Decimal) -> String {
    format_fixed(value, 2)
}

/// Exchange rate: four decimals, as published by NBP. `4.3213` → `"4,3213"`.
pub fn format_rate(value: Decimal) -> String {
    format_fixed(value, 4)
}

/// Quantity: as many decimals as needed, none for whole numbers.
/// `2.50` → `"2,5"`, `1000` → `"1 000"`.
pub fn format_quantity(value: Decimal) -> String {
    let normalized = value.normalize();
    format_fixed(normalized, normalized.scale())
}

/// ISO date, or an empty string when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Parse an amount typed into the form.
///
/// Accepts a decimal comma or point and space-grouped thousands
/// (`"1 234,5"`). Returns `None` for empty or malformed input and for values
/// beyond [`MAX_LINE_VALUE`](crate::core::MAX_LINE_VALUE).
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .ok()
        .filter(|v| is_within_line_limit(*v))
}

fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}
