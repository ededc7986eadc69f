use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{ExpenseNode, IncomeSpec};

/// Key the state is stored under in key-value backends.
pub const STATE_KEY: &str = "income-architect-v1";

/// Everything the user has entered: the income declaration and the
/// expense forest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub income: IncomeSpec,
    pub expenses: Vec<ExpenseNode>,
}

impl PersistedState {
    pub fn new(
        income: IncomeSpec,
        expenses: Vec<ExpenseNode>,
    ) -> Self {
        Self { income, expenses }
    }

    /// Parses a stored payload without ever failing.
    ///
    /// * unparsable payload: defaults for everything
    /// * missing or malformed `income`: default income, expenses kept
    /// * missing or malformed `expenses`: empty forest, income kept
    pub fn from_json(payload: &str) -> Self {
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "stored state is not valid JSON; using defaults");
                return Self::default();
            }
        };

        let income = match value.get("income") {
            Some(raw) => IncomeSpec::deserialize(raw).unwrap_or_else(|error| {
                warn!(%error, "stored income record is malformed; using defaults");
                IncomeSpec::default()
            }),
            None => IncomeSpec::default(),
        };

        let expenses = match value.get("expenses") {
            Some(raw) => Vec::<ExpenseNode>::deserialize(raw).unwrap_or_else(|error| {
                warn!(%error, "stored expense forest is malformed; starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self { income, expenses }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
