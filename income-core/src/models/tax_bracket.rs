use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of a progressive bracket table.
///
/// `limit` is the cumulative income ceiling taxed at `rate`; `None` marks
/// the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub limit: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            limit: Some(limit),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self { limit: None, rate }
    }

    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none()
    }
}

/// Built-in single-filer table (2024 thresholds, illustrative only).
pub static DEFAULT_TAX_BRACKETS: LazyLock<Vec<TaxBracket>> = LazyLock::new(|| {
    vec![
        TaxBracket::bounded(Decimal::new(11600, 0), Decimal::new(10, 2)),
        TaxBracket::bounded(Decimal::new(47150, 0), Decimal::new(12, 2)),
        TaxBracket::bounded(Decimal::new(100525, 0), Decimal::new(22, 2)),
        TaxBracket::bounded(Decimal::new(191950, 0), Decimal::new(24, 2)),
        TaxBracket::bounded(Decimal::new(243725, 0), Decimal::new(32, 2)),
        TaxBracket::bounded(Decimal::new(609350, 0), Decimal::new(35, 2)),
        TaxBracket::unbounded(Decimal::new(37, 2)),
    ]
});
