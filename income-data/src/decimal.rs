use rust_decimal::Decimal;
use serde::Deserialize;

/// Parses a CSV decimal cell, ignoring surrounding whitespace and thousands
/// separators.
pub(crate) fn parse_cell(s: &str) -> Result<Decimal, rust_decimal::Error> {
    s.trim().replace(',', "").parse::<Decimal>()
}

pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_cell(&s).map_err(serde::de::Error::custom)
}

/// An empty cell is `None`.
pub(crate) fn deserialize_optional_decimal<'de, D>(
    deserializer: D
) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_cell(&s).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
