use std::sync::LazyLock;

use income_core::calculations::common::{round_half_up, round_whole};
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace, drops a leading
/// currency sign and thousands separators.
fn normalize_decimal_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed.strip_prefix('$').unwrap_or(trimmed).replace(',', "")
}

/// Parses a user-entered amount.
///
/// Handles `$` and comma separators (e.g. `"$1,234.56"`). Empty input is
/// treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

/// [`parse_decimal`] that also rejects negative amounts.
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let value = parse_decimal(s).map_err(|e| e.to_string())?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(format!("amount '{s}' must not be negative"));
    }
    Ok(value)
}

/// Working hours per day, `1..=24`.
pub fn parse_hours_per_day(s: &str) -> Result<Decimal, String> {
    parse_in_range(s, "hours per day", Decimal::ONE, Decimal::from(24))
}

/// Working days per week, `1..=7`.
pub fn parse_days_per_week(s: &str) -> Result<Decimal, String> {
    parse_in_range(s, "days per week", Decimal::ONE, Decimal::from(7))
}

fn parse_in_range(
    s: &str,
    what: &str,
    min: Decimal,
    max: Decimal,
) -> Result<Decimal, String> {
    let value = parse_decimal(s).map_err(|e| e.to_string())?;
    if value < min || value > max {
        return Err(format!("{what} must be between {min} and {max}, got '{}'", s.trim()));
    }
    Ok(value)
}

static COLOR_PATTERN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:#[0-9a-fA-F]{3}|#[0-9a-fA-F]{6}|hsl\(\s*\d{1,3}\s*,\s*\d{1,3}%\s*,\s*\d{1,3}%\s*\))$",
    )
});

/// Accepts `#rgb`, `#rrggbb` and `hsl(H, S%, L%)`.
pub fn parse_color(s: &str) -> Result<String, String> {
    let pattern = COLOR_PATTERN.as_ref().map_err(|e| e.to_string())?;
    let trimmed = s.trim();
    if pattern.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(format!("'{s}' is not a color; use #rrggbb or hsl(H, S%, L%)"))
    }
}

/// Formats money with cents and thousands separators.
pub fn format_money(value: Decimal) -> String {
    group_thousands(round_half_up(value), 2)
}

/// Formats money rounded to whole units, for headline figures.
pub fn format_money_whole(value: Decimal) -> String {
    group_thousands(round_whole(value), 0)
}

fn group_thousands(
    rounded: Decimal,
    decimals: usize,
) -> String {
    let text = format!("{:.*}", decimals, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_decimal_accepts_separators_and_currency() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("$62,400").unwrap(), dec!(62400));
        assert_eq!(parse_decimal("  30  ").unwrap(), dec!(30));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn parse_amount_rejects_negatives() {
        assert!(parse_amount("-5").is_err());
        assert_eq!(parse_amount("5"), Ok(dec!(5)));
    }

    #[test]
    fn schedule_parsers_accept_their_ranges() {
        assert_eq!(parse_hours_per_day("1"), Ok(dec!(1)));
        assert_eq!(parse_hours_per_day("7.5"), Ok(dec!(7.5)));
        assert_eq!(parse_hours_per_day("24"), Ok(dec!(24)));
        assert_eq!(parse_days_per_week("1"), Ok(dec!(1)));
        assert_eq!(parse_days_per_week("7"), Ok(dec!(7)));
    }

    #[test]
    fn schedule_parsers_reject_out_of_range_values() {
        assert!(parse_hours_per_day("0").is_err());
        assert!(parse_hours_per_day("").is_err());
        assert!(parse_hours_per_day("24.5").is_err());
        assert!(parse_hours_per_day("100000000000000000000").is_err());
        assert!(parse_days_per_week("0").is_err());
        assert!(parse_days_per_week("8").is_err());
        assert!(parse_days_per_week("-1").is_err());
        assert!(parse_days_per_week("lots").is_err());
    }

    #[test]
    fn parse_color_accepts_hex_and_hsl() {
        assert_eq!(parse_color("#ff0000"), Ok("#ff0000".to_string()));
        assert_eq!(parse_color("#abc"), Ok("#abc".to_string()));
        assert_eq!(parse_color(" hsl(120, 75%, 50%) "), Ok("hsl(120, 75%, 50%)".to_string()));
    }

    #[test]
    fn parse_color_rejects_names() {
        assert!(parse_color("red").is_err());
        assert!(parse_color("#12345").is_err());
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(dec!(48627)), "$48,627.00");
        assert_eq!(format_money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_money(dec!(999.995)), "$1,000.00");
        assert_eq!(format_money(dec!(0)), "$0.00");
        assert_eq!(format_money(dec!(-12000)), "-$12,000.00");
    }

    #[test]
    fn format_money_whole_drops_cents() {
        assert_eq!(format_money_whole(dec!(48626.5)), "$48,627");
        assert_eq!(format_money_whole(dec!(8781)), "$8,781");
    }
}
