//! Composition of the full result from an income declaration and an
//! expense forest.
//!
//! # Pipeline
//!
//! | Step | Figure |
//! |------|--------|
//! | 1 | Gross annual: income amount annualized on the income's own schedule |
//! | 2 | Federal tax: bracket walk over gross (gross income only) |
//! | 3 | State tax: gross × jurisdiction rate (gross income only) |
//! | 4 | Net annual: gross − federal − state, or gross verbatim for net income |
//! | 5 | Expenses annual: sum of the flattened root totals |
//! | 6 | Take-home: max(0, net − expenses) |
//! | 7 | Period breakdown: take-home ÷ 12, 52, days×52, hours×days×52 |
//!
//! Net income is taken as already post-tax. No gross figure is inferred
//! from it, so both tax figures are zero.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use income_core::{Cadence, ExpenseNode, IncomeSpec};
//! use income_core::calculations::compute;
//!
//! let income = IncomeSpec::net(dec!(5000), Cadence::Monthly);
//! let expenses = vec![ExpenseNode::new("rent", "Rent", dec!(1000), Cadence::Monthly)];
//!
//! let result = compute(&income, &expenses);
//!
//! assert_eq!(result.take_home_annual, dec!(48000));
//! assert_eq!(result.period_breakdown.monthly, dec!(4000));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::cadence::to_annual;
use super::common::{MONTHS_PER_YEAR, WEEKS_PER_YEAR, max, saturating_div};
use super::expenses::flatten;
use super::federal_tax::FederalTaxCalculator;
use super::state_tax::state_tax;
use crate::models::{
    CalculationResult, DEFAULT_JURISDICTIONS, DEFAULT_TAX_BRACKETS, ExpenseNode, IncomeSpec, JurisdictionTable,
    PeriodBreakdown, TaxBracket,
};

/// Computes results against an injected bracket table and jurisdiction
/// table.
#[derive(Debug, Clone)]
pub struct ResultsComposer<'a> {
    brackets: &'a [TaxBracket],
    jurisdictions: &'a JurisdictionTable,
}

impl<'a> ResultsComposer<'a> {
    pub fn new(
        brackets: &'a [TaxBracket],
        jurisdictions: &'a JurisdictionTable,
    ) -> Self {
        Self {
            brackets,
            jurisdictions,
        }
    }

    /// Runs the whole pipeline. Pure: identical inputs give identical
    /// results.
    pub fn compute(
        &self,
        income: &IncomeSpec,
        expenses: &[ExpenseNode],
    ) -> CalculationResult {
        let gross_annual = to_annual(
            income.amount,
            income.cadence,
            income.hours_per_day,
            income.days_per_week,
        );

        let (federal_tax_annual, state_tax_annual) = if income.is_gross {
            (
                FederalTaxCalculator::new(self.brackets).tax(gross_annual),
                state_tax(gross_annual, &income.jurisdiction, self.jurisdictions),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        let net_annual = gross_annual
            .saturating_sub(federal_tax_annual)
            .saturating_sub(state_tax_annual);

        let expense_breakdown = flatten(expenses);
        let expenses_annual = expense_breakdown
            .iter()
            .map(|e| e.annual_value)
            .fold(Decimal::ZERO, Decimal::saturating_add);

        let take_home_annual = max(Decimal::ZERO, net_annual.saturating_sub(expenses_annual));

        let working_days_per_year = income.effective_days_per_week().saturating_mul(WEEKS_PER_YEAR);
        let working_hours_per_year = income
            .effective_hours_per_day()
            .saturating_mul(working_days_per_year);
        let period_breakdown = PeriodBreakdown {
            monthly: take_home_annual / MONTHS_PER_YEAR,
            weekly: take_home_annual / WEEKS_PER_YEAR,
            daily: saturating_div(take_home_annual, working_days_per_year),
            hourly: saturating_div(take_home_annual, working_hours_per_year),
        };

        debug!(
            %gross_annual,
            %net_annual,
            %expenses_annual,
            %take_home_annual,
            roots = expenses.len(),
            "computed results"
        );

        CalculationResult {
            gross_annual,
            net_annual,
            federal_tax_annual,
            state_tax_annual,
            total_tax_annual: federal_tax_annual.saturating_add(state_tax_annual),
            expenses_annual,
            take_home_annual,
            expense_breakdown,
            period_breakdown,
            working_days_per_year,
        }
    }
}

/// [`ResultsComposer::compute`] with the built-in bracket and jurisdiction
/// tables.
pub fn compute(
    income: &IncomeSpec,
    expenses: &[ExpenseNode],
) -> CalculationResult {
    ResultsComposer::new(&DEFAULT_TAX_BRACKETS, &DEFAULT_JURISDICTIONS).compute(income, expenses)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::federal_tax::federal_tax;
    use crate::models::{Cadence, DisplayPeriod, Jurisdiction};

    #[test]
    fn hourly_gross_in_california_without_expenses() {
        let income = IncomeSpec::gross(dec!(30), Cadence::Hourly).with_jurisdiction("CA");

        let result = compute(&income, &[]);

        assert_eq!(result.gross_annual, dec!(62400));
        assert_eq!(result.federal_tax_annual, federal_tax(dec!(62400)));
        assert_eq!(result.federal_tax_annual, dec!(8781));
        assert_eq!(result.state_tax_annual, dec!(4992));
        assert_eq!(result.total_tax_annual, dec!(13773));
        assert_eq!(result.net_annual, dec!(48627));
        assert_eq!(result.take_home_annual, dec!(48627));
        assert!(result.expense_breakdown.is_empty());
    }

    #[test]
    fn net_income_with_one_monthly_expense() {
        let income = IncomeSpec::net(dec!(5000), Cadence::Monthly);
        let expenses = vec![ExpenseNode::new("r", "Rent", dec!(1000), Cadence::Monthly)];

        let result = compute(&income, &expenses);

        assert_eq!(result.net_annual, dec!(60000));
        assert_eq!(result.federal_tax_annual, Decimal::ZERO);
        assert_eq!(result.state_tax_annual, Decimal::ZERO);
        assert_eq!(result.expenses_annual, dec!(12000));
        assert_eq!(result.take_home_annual, dec!(48000));
        assert_eq!(result.period_breakdown.monthly, dec!(4000));
    }

    #[test]
    fn net_income_ignores_jurisdiction() {
        let income = IncomeSpec::net(dec!(5000), Cadence::Monthly).with_jurisdiction("OR");

        let result = compute(&income, &[]);

        assert_eq!(result.state_tax_annual, Decimal::ZERO);
        assert_eq!(result.net_annual, result.gross_annual);
    }

    #[test]
    fn take_home_is_floored_at_zero() {
        let income = IncomeSpec::net(dec!(1000), Cadence::Monthly);
        let expenses = vec![ExpenseNode::new("r", "Rent", dec!(2000), Cadence::Monthly)];

        let result = compute(&income, &expenses);

        assert_eq!(result.take_home_annual, Decimal::ZERO);
        assert_eq!(result.shortfall(), dec!(-12000));
        assert_eq!(result.period_breakdown.hourly, Decimal::ZERO);
    }

    #[test]
    fn period_breakdown_uses_income_schedule() {
        let income = IncomeSpec::net(dec!(41600), Cadence::Yearly).with_schedule(dec!(10), dec!(4));

        let result = compute(&income, &[]);

        assert_eq!(result.period_breakdown.weekly, dec!(800));
        assert_eq!(result.period_breakdown.daily, dec!(200));
        assert_eq!(result.period_breakdown.hourly, dec!(20));
    }

    #[test]
    fn zero_schedule_falls_back_to_defaults_for_breakdown() {
        let income = IncomeSpec::net(dec!(20800), Cadence::Yearly).with_schedule(dec!(0), dec!(0));

        let result = compute(&income, &[]);

        assert_eq!(result.period_breakdown.daily, dec!(80));
        assert_eq!(result.period_breakdown.hourly, dec!(10));
        assert_eq!(result.working_days_per_year, dec!(260));
    }

    #[test]
    fn zero_schedule_with_hourly_income_yields_zero_gross() {
        let income = IncomeSpec::gross(dec!(30), Cadence::Hourly).with_schedule(dec!(0), dec!(5));

        let result = compute(&income, &[]);

        assert_eq!(result.gross_annual, Decimal::ZERO);
        assert_eq!(result.take_home_annual, Decimal::ZERO);
    }

    #[test]
    fn expenses_are_summed_per_root() {
        let income = IncomeSpec::net(dec!(100000), Cadence::Yearly);
        let expenses = vec![
            ExpenseNode::new("h", "Housing", Decimal::ZERO, Cadence::Monthly).with_children(vec![
                ExpenseNode::new("r", "Rent", dec!(1500), Cadence::Monthly),
                ExpenseNode::new("u", "Utilities", dec!(100), Cadence::Monthly),
            ]),
            ExpenseNode::new("g", "Groceries", dec!(100), Cadence::Weekly),
            ExpenseNode::new("e", "Empty", Decimal::ZERO, Cadence::Monthly),
        ];

        let result = compute(&income, &expenses);

        assert_eq!(result.expense_breakdown.len(), 2);
        assert_eq!(result.expense_breakdown[0].annual_value, dec!(19200));
        assert_eq!(result.expense_breakdown[1].annual_value, dec!(5200));
        assert_eq!(result.expenses_annual, dec!(24400));
        assert_eq!(result.take_home_annual, dec!(75600));
    }

    #[test]
    fn injected_tables_override_builtins() {
        let brackets = vec![TaxBracket::unbounded(dec!(0.20))];
        let jurisdictions = JurisdictionTable::new([Jurisdiction::new("ZZ", "Zed", dec!(0.05))]);
        let composer = ResultsComposer::new(&brackets, &jurisdictions);
        let income = IncomeSpec::gross(dec!(100000), Cadence::Yearly).with_jurisdiction("ZZ");

        let result = composer.compute(&income, &[]);

        assert_eq!(result.federal_tax_annual, dec!(20000));
        assert_eq!(result.state_tax_annual, dec!(5000));
        assert_eq!(result.net_annual, dec!(75000));
    }

    #[test]
    fn huge_figures_saturate_instead_of_panicking() {
        let income = IncomeSpec::gross(Decimal::MAX, Cadence::Hourly);
        let expenses = vec![
            ExpenseNode::new("a", "A", Decimal::MAX, Cadence::Monthly),
            ExpenseNode::new("b", "B", Decimal::MAX, Cadence::Weekly),
        ];

        let result = compute(&income, &expenses);

        assert_eq!(result.gross_annual, Decimal::MAX);
        assert_eq!(result.expenses_annual, Decimal::MAX);
        assert!(result.federal_tax_annual > Decimal::ZERO);
        assert!(result.net_annual < result.gross_annual);
        assert_eq!(result.take_home_annual, Decimal::ZERO);
        assert!(result.shortfall() < Decimal::ZERO);
    }

    #[test]
    fn tiny_schedule_saturates_per_day_figures() {
        let income =
            IncomeSpec::net(Decimal::MAX, Cadence::Yearly).with_schedule(dec!(0.0001), dec!(0.0001));

        let result = compute(&income, &[]);

        assert_eq!(result.period_breakdown.daily, Decimal::MAX);
        assert_eq!(result.period_breakdown.hourly, Decimal::MAX);
        assert_eq!(result.at_period(DisplayPeriod::Day).take_home, Decimal::MAX);
    }

    #[test]
    fn compute_is_idempotent() {
        let income = IncomeSpec::gross(dec!(3210.55), Cadence::BiWeekly).with_jurisdiction("NY");
        let expenses = vec![ExpenseNode::new("x", "X", dec!(321.12), Cadence::Monthly)];

        assert_eq!(compute(&income, &expenses), compute(&income, &expenses));
    }
}
