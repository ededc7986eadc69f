use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::saturating_div;

/// One slice of the expense breakdown: a root expense and its full
/// subtree total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBreakdownEntry {
    pub name: String,
    pub annual_value: Decimal,
    pub color: String,
}

/// Take-home restated at shorter cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBreakdown {
    pub monthly: Decimal,
    pub weekly: Decimal,
    pub daily: Decimal,
    pub hourly: Decimal,
}

/// Output of the results composer. Always recomputed from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub gross_annual: Decimal,
    pub net_annual: Decimal,
    pub federal_tax_annual: Decimal,
    pub state_tax_annual: Decimal,
    pub total_tax_annual: Decimal,
    pub expenses_annual: Decimal,
    /// `max(0, net_annual - expenses_annual)`.
    pub take_home_annual: Decimal,
    pub expense_breakdown: Vec<ExpenseBreakdownEntry>,
    pub period_breakdown: PeriodBreakdown,
    /// Working days per year used for the daily figures.
    pub working_days_per_year: Decimal,
}

impl CalculationResult {
    /// Net income minus expenses without the zero floor. Negative when
    /// expenses exceed net income.
    pub fn shortfall(&self) -> Decimal {
        self.net_annual.saturating_sub(self.expenses_annual)
    }

    /// Restates the headline figures at `period`.
    pub fn at_period(
        &self,
        period: DisplayPeriod,
    ) -> PeriodView {
        let divisor = match period {
            DisplayPeriod::Year => Decimal::ONE,
            DisplayPeriod::Month => Decimal::from(12),
            DisplayPeriod::Week => Decimal::from(52),
            DisplayPeriod::Day if self.working_days_per_year > Decimal::ZERO => {
                self.working_days_per_year
            }
            DisplayPeriod::Day => Decimal::from(260),
        };
        let scale = |value: Decimal| saturating_div(value, divisor);

        PeriodView {
            period,
            gross: scale(self.gross_annual),
            federal_tax: scale(self.federal_tax_annual),
            state_tax: scale(self.state_tax_annual),
            total_tax: scale(self.total_tax_annual),
            expenses: scale(self.expenses_annual),
            take_home: scale(self.take_home_annual),
            expense_breakdown: self
                .expense_breakdown
                .iter()
                .map(|entry| ExpenseBreakdownEntry {
                    annual_value: scale(entry.annual_value),
                    ..entry.clone()
                })
                .collect(),
        }
    }
}

/// The period the results view is shown at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayPeriod {
    Year,
    #[default]
    Month,
    Week,
    Day,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown display period '{0}'; expected year, month, week or day")]
pub struct ParseDisplayPeriodError(String);

impl DisplayPeriod {
    pub const ALL: [DisplayPeriod; 4] = [Self::Year, Self::Month, Self::Week, Self::Day];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Month => "Month",
            Self::Week => "Week",
            Self::Day => "Day",
        }
    }
}

impl fmt::Display for DisplayPeriod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayPeriod {
    type Err = ParseDisplayPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "year" | "yearly" => Ok(Self::Year),
            "month" | "monthly" => Ok(Self::Month),
            "week" | "weekly" => Ok(Self::Week),
            "day" | "daily" => Ok(Self::Day),
            _ => Err(ParseDisplayPeriodError(s.to_string())),
        }
    }
}

/// Headline figures restated at one display period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodView {
    pub period: DisplayPeriod,
    pub gross: Decimal,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub total_tax: Decimal,
    pub expenses: Decimal,
    pub take_home: Decimal,
    /// Breakdown entries with `annual_value` restated at `period`.
    pub expense_breakdown: Vec<ExpenseBreakdownEntry>,
}
