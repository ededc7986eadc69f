use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Cadence;
use super::amount::deserialize_lenient_amount;

/// Hours per working day assumed when none (or zero) is supplied.
pub const DEFAULT_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Working days per week assumed when none (or zero) is supplied.
pub const DEFAULT_DAYS_PER_WEEK: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Jurisdiction code meaning "federal tax only".
pub const NO_JURISDICTION: &str = "NONE";

/// The user's income declaration.
///
/// Field names follow the persisted record layout (`isGross`,
/// `hoursPerDay`, ...). Every field except `amount` is required when
/// deserializing; callers that need a forgiving load go through
/// [`crate::PersistedState::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSpec {
    /// The figure as entered, at `cadence`.
    #[serde(default, deserialize_with = "deserialize_lenient_amount")]
    pub amount: Decimal,

    #[serde(alias = "timeFrame")]
    pub cadence: Cadence,

    /// `true` when `amount` is pre-tax.
    pub is_gross: bool,

    /// Only consulted for hourly income and the hourly breakdown.
    pub hours_per_day: Decimal,

    /// Consulted for hourly and daily income and the daily/hourly breakdown.
    pub days_per_week: Decimal,

    /// Key into the jurisdiction table, or [`NO_JURISDICTION`].
    #[serde(alias = "stateCode")]
    pub jurisdiction: String,
}

impl Default for IncomeSpec {
    fn default() -> Self {
        Self {
            amount: Decimal::ZERO,
            cadence: Cadence::Hourly,
            is_gross: true,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            days_per_week: DEFAULT_DAYS_PER_WEEK,
            jurisdiction: NO_JURISDICTION.to_string(),
        }
    }
}

impl IncomeSpec {
    /// Pre-tax income on the default 8h x 5d schedule with no state tax.
    pub fn gross(
        amount: Decimal,
        cadence: Cadence,
    ) -> Self {
        Self {
            amount,
            cadence,
            ..Default::default()
        }
    }

    /// Post-tax income on the default schedule.
    pub fn net(
        amount: Decimal,
        cadence: Cadence,
    ) -> Self {
        Self {
            amount,
            cadence,
            is_gross: false,
            ..Default::default()
        }
    }

    pub fn with_schedule(
        mut self,
        hours_per_day: Decimal,
        days_per_week: Decimal,
    ) -> Self {
        self.hours_per_day = hours_per_day;
        self.days_per_week = days_per_week;
        self
    }

    pub fn with_jurisdiction(
        mut self,
        code: impl Into<String>,
    ) -> Self {
        self.jurisdiction = code.into();
        self
    }

    /// `hours_per_day`, or the default when it is not positive.
    pub fn effective_hours_per_day(&self) -> Decimal {
        positive_or(self.hours_per_day, DEFAULT_HOURS_PER_DAY)
    }

    /// `days_per_week`, or the default when it is not positive.
    pub fn effective_days_per_week(&self) -> Decimal {
        positive_or(self.days_per_week, DEFAULT_DAYS_PER_WEEK)
    }
}

fn positive_or(
    value: Decimal,
    fallback: Decimal,
) -> Decimal {
    if value > Decimal::ZERO { value } else { fallback }
}
