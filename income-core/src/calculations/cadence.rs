//! Conversion of cadence-tagged amounts to and from annual figures.
//!
//! | Cadence   | Annual multiplier               |
//! |-----------|---------------------------------|
//! | Hourly    | hours/day × days/week × 52      |
//! | Daily     | days/week × 52                  |
//! | Weekly    | 52                              |
//! | Bi-Weekly | 26                              |
//! | Monthly   | 12                              |
//! | Yearly    | 1                               |
//!
//! An unrecognised cadence contributes nothing.

use rust_decimal::Decimal;

use super::common::{
    BIWEEKLY_PERIODS_PER_YEAR, DAYS_PER_YEAR, MONTHS_PER_YEAR, WEEKS_PER_YEAR,
    checked_div_or_zero,
};
use crate::models::{Cadence, DEFAULT_DAYS_PER_WEEK, DEFAULT_HOURS_PER_DAY};

/// Converts `amount` at `cadence` to its yearly equivalent.
///
/// The schedule parameters only matter for `Hourly` (both) and `Daily`
/// (`days_per_week`). Zero amounts short-circuit to zero, and results past
/// the `Decimal` range saturate at `Decimal::MAX`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use income_core::Cadence;
/// use income_core::calculations::to_annual;
///
/// assert_eq!(to_annual(dec!(30), Cadence::Hourly, dec!(8), dec!(5)), dec!(62400));
/// assert_eq!(to_annual(dec!(1000), Cadence::Monthly, dec!(8), dec!(5)), dec!(12000));
/// ```
pub fn to_annual(
    amount: Decimal,
    cadence: Cadence,
    hours_per_day: Decimal,
    days_per_week: Decimal,
) -> Decimal {
    if amount.is_zero() {
        return Decimal::ZERO;
    }

    match cadence {
        Cadence::Hourly => amount
            .saturating_mul(hours_per_day)
            .saturating_mul(days_per_week)
            .saturating_mul(WEEKS_PER_YEAR),
        Cadence::Daily => amount
            .saturating_mul(days_per_week)
            .saturating_mul(WEEKS_PER_YEAR),
        Cadence::Weekly => amount.saturating_mul(WEEKS_PER_YEAR),
        Cadence::BiWeekly => amount.saturating_mul(BIWEEKLY_PERIODS_PER_YEAR),
        Cadence::Monthly => amount.saturating_mul(MONTHS_PER_YEAR),
        Cadence::Yearly => amount,
        Cadence::Unrecognized => Decimal::ZERO,
    }
}

/// [`to_annual`] on the default 8 hours × 5 days schedule. Expenses are
/// always annualized this way.
pub fn to_annual_default(
    amount: Decimal,
    cadence: Cadence,
) -> Decimal {
    to_annual(amount, cadence, DEFAULT_HOURS_PER_DAY, DEFAULT_DAYS_PER_WEEK)
}

/// Restates an annual figure at `cadence` for display.
///
/// Daily uses 365 calendar days and Hourly the default 8 × 5 × 52 working
/// hours, so this is not an exact inverse of [`to_annual`] for those two.
pub fn from_annual(
    annual: Decimal,
    cadence: Cadence,
) -> Decimal {
    let divisor = match cadence {
        Cadence::Hourly => DEFAULT_HOURS_PER_DAY * DEFAULT_DAYS_PER_WEEK * WEEKS_PER_YEAR,
        Cadence::Daily => DAYS_PER_YEAR,
        Cadence::Weekly => WEEKS_PER_YEAR,
        Cadence::BiWeekly => BIWEEKLY_PERIODS_PER_YEAR,
        Cadence::Monthly => MONTHS_PER_YEAR,
        Cadence::Yearly | Cadence::Unrecognized => Decimal::ONE,
    };
    checked_div_or_zero(annual, divisor)
}
