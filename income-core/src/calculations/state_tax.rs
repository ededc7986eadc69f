//! Flat-rate state tax lookup.

use rust_decimal::Decimal;

use crate::models::JurisdictionTable;

/// `annual_gross × rate(jurisdiction)`. Unknown codes and `"NONE"` owe
/// nothing.
pub fn state_tax(
    annual_gross: Decimal,
    jurisdiction: &str,
    table: &JurisdictionTable,
) -> Decimal {
    annual_gross.saturating_mul(table.rate(jurisdiction))
}
