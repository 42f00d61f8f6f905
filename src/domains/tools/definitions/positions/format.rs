//! Number formatting helpers for position reports.
//!
//! Quantities are rendered with thousands separators and no decimals,
//! money with a `$` prefix and two decimals. Negative money keeps the sign
//! after the currency symbol (`$-1,234.50`). Integer amounts are printed
//! from their exact value.

use super::model::Amount;

/// Format a number with `,` thousands separators and a fixed number of decimals.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    group_digits(format!("{:.*}", decimals, value))
}

/// Like [`group_thousands`], for an exact integer.
pub fn group_integer(value: i128, decimals: usize) -> String {
    if decimals == 0 {
        group_digits(value.to_string())
    } else {
        group_digits(format!("{}.{}", value, "0".repeat(decimals)))
    }
}

fn group_amount(value: Amount, decimals: usize) -> String {
    match value {
        Amount::Integer(i) => group_integer(i, decimals),
        Amount::Float(x) => group_thousands(x, decimals),
    }
}

/// Insert `,` separators into the integer part of a formatted number.
fn group_digits(formatted: String) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };

    // inf / NaN have no digits to group
    if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
        return formatted;
    }

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format a share quantity, e.g. `1,250`.
pub fn format_quantity(value: Amount) -> String {
    group_amount(value, 0)
}

/// Format a money amount, e.g. `$15,000.00` or `$-42.10`.
pub fn format_money(value: Amount) -> String {
    format!("${}", group_amount(value, 2))
}

/// Format a percentage with two decimals, e.g. `50.00%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}
