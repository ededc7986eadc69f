//! Common helpers shared by the calculation modules.
//!
//! Calculations never round; rounding is applied only when figures are
//! presented.
//!
//! Arithmetic in the engine saturates: a figure that would leave the
//! `Decimal` range is clamped to `Decimal::MAX` (or `Decimal::MIN`) instead
//! of panicking.

use rust_decimal::Decimal;

/// Weeks in a year for every cadence conversion.
pub const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

/// Bi-weekly pay periods per year.
pub const BIWEEKLY_PERIODS_PER_YEAR: Decimal = Decimal::from_parts(26, 0, 0, false, 0);

pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Calendar days used when restating an annual figure at a daily cadence.
pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use income_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole currency units, half away from zero. Used for the
/// headline figures, which are shown without cents.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use income_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Divides `value` by `divisor`, returning zero instead of panicking when
/// the divisor is zero.
pub fn checked_div_or_zero(
    value: Decimal,
    divisor: Decimal,
) -> Decimal {
    value.checked_div(divisor).unwrap_or(Decimal::ZERO)
}

/// Divides `value` by `divisor`, clamping to `Decimal::MAX` or
/// `Decimal::MIN` when the quotient does not fit. A zero divisor yields
/// zero.
pub fn saturating_div(
    value: Decimal,
    divisor: Decimal,
) -> Decimal {
    if divisor.is_zero() {
        return Decimal::ZERO;
    }
    match value.checked_div(divisor) {
        Some(quotient) => quotient,
        None if value.is_sign_negative() == divisor.is_sign_negative() => Decimal::MAX,
        None => Decimal::MIN,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_repeating_division() {
        let monthly = dec!(1000) / dec!(12);

        assert_eq!(round_half_up(monthly), dec!(83.33));
    }

    // =========================================================================
    // round_whole tests
    // =========================================================================

    #[test]
    fn round_whole_rounds_half_away_from_zero() {
        assert_eq!(round_whole(dec!(2.5)), dec!(3));
        assert_eq!(round_whole(dec!(2.49)), dec!(2));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
    }

    #[test]
    fn max_floors_negative_at_zero() {
        assert_eq!(max(dec!(-50.00), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn max_handles_equal_values() {
        assert_eq!(max(dec!(150.00), dec!(150.00)), dec!(150.00));
    }

    // =========================================================================
    // checked_div_or_zero tests
    // =========================================================================

    #[test]
    fn checked_div_or_zero_divides_normally() {
        assert_eq!(checked_div_or_zero(dec!(520), dec!(52)), dec!(10));
    }

    #[test]
    fn checked_div_or_zero_returns_zero_for_zero_divisor() {
        assert_eq!(checked_div_or_zero(dec!(520), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // saturating_div tests
    // =========================================================================

    #[test]
    fn saturating_div_divides_normally() {
        assert_eq!(saturating_div(dec!(100), dec!(8)), dec!(12.5));
    }

    #[test]
    fn saturating_div_clamps_on_overflow() {
        assert_eq!(saturating_div(Decimal::MAX, dec!(0.5)), Decimal::MAX);
        assert_eq!(saturating_div(Decimal::MIN, dec!(0.5)), Decimal::MIN);
        assert_eq!(saturating_div(Decimal::MAX, dec!(-0.5)), Decimal::MIN);
    }

    #[test]
    fn saturating_div_by_zero_is_zero() {
        assert_eq!(saturating_div(dec!(5), Decimal::ZERO), Decimal::ZERO);
    }
}
