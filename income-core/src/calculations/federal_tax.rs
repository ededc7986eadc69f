//! Progressive federal income tax over a marginal bracket table.
//!
//! Each bracket taxes only the slice of income between the previous
//! bracket's limit and its own. The walk stops as soon as a bracket has
//! nothing left to tax, or after the unbounded top bracket.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use income_core::TaxBracket;
//! use income_core::calculations::FederalTaxCalculator;
//!
//! let brackets = vec![
//!     TaxBracket::bounded(dec!(10000), dec!(0.10)),
//!     TaxBracket::bounded(dec!(40000), dec!(0.20)),
//!     TaxBracket::unbounded(dec!(0.30)),
//! ];
//!
//! let calculator = FederalTaxCalculator::new(&brackets);
//!
//! // 10000 × 10% + 30000 × 20% + 10000 × 30%
//! assert_eq!(calculator.tax(dec!(50000)), dec!(10000));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{DEFAULT_TAX_BRACKETS, TaxBracket};

/// Problems with a bracket table supplied as data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("bracket {index} limit {limit} does not exceed the previous limit {previous}")]
    NotAscending {
        index: usize,
        limit: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { index: usize },

    #[error("the last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("bracket {index} rate {rate} is outside [0, 1)")]
    RateOutOfRange { index: usize, rate: Decimal },
}

/// Checks that `brackets` is a usable progressive table: non-empty,
/// strictly ascending positive limits, rates in `[0, 1)`, and exactly one
/// unbounded bracket at the end.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), BracketTableError> {
    if brackets.is_empty() {
        return Err(BracketTableError::Empty);
    }

    let last = brackets.len() - 1;
    let mut previous = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
            return Err(BracketTableError::RateOutOfRange {
                index,
                rate: bracket.rate,
            });
        }

        match bracket.limit {
            Some(limit) if limit <= previous => {
                return Err(BracketTableError::NotAscending {
                    index,
                    limit,
                    previous,
                });
            }
            Some(limit) => previous = limit,
            None if index != last => return Err(BracketTableError::UnboundedNotLast { index }),
            None => {}
        }
    }

    if !brackets[last].is_unbounded() {
        return Err(BracketTableError::MissingUnboundedBracket);
    }

    Ok(())
}

/// Applies a bracket table to an annual gross figure.
///
/// Brackets must be ascending by limit. A table without an unbounded
/// bracket simply leaves income above its last limit untaxed.
#[derive(Debug, Clone)]
pub struct FederalTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> FederalTaxCalculator<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Tax owed on `annual_gross`. Never negative for non-negative input
    /// and non-decreasing as income grows.
    pub fn tax(
        &self,
        annual_gross: Decimal,
    ) -> Decimal {
        let mut tax = Decimal::ZERO;
        let mut remaining = annual_gross;
        let mut previous_limit = Decimal::ZERO;

        for bracket in self.brackets {
            let taxable_here = match bracket.limit {
                Some(limit) => remaining.min(limit - previous_limit),
                None => remaining,
            };
            if taxable_here <= Decimal::ZERO {
                break;
            }

            tax = tax.saturating_add(taxable_here.saturating_mul(bracket.rate));
            remaining -= taxable_here;

            match bracket.limit {
                Some(limit) => previous_limit = limit,
                None => break,
            }
        }

        tax
    }

    /// Rate applied to the next unit of income above `annual_gross`.
    pub fn marginal_rate(
        &self,
        annual_gross: Decimal,
    ) -> Decimal {
        self.brackets
            .iter()
            .find(|b| b.limit.is_none_or(|limit| annual_gross < limit))
            .map_or(Decimal::ZERO, |b| b.rate)
    }
}

/// Federal tax on `annual_gross` using the built-in bracket table.
pub fn federal_tax(annual_gross: Decimal) -> Decimal {
    FederalTaxCalculator::new(&DEFAULT_TAX_BRACKETS).tax(annual_gross)
}
