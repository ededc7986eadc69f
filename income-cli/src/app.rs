//! A loaded estimator session: the user's state plus the reference tables,
//! saved back through the repository after every edit.

use income_core::calculations::ResultsComposer;
use income_core::db::{MemoryRepositoryFactory, RepositoryRegistry};
use income_core::{
    Cadence, CalculationResult, DEFAULT_TAX_BRACKETS, EstimatorRepository, ExpenseDraft,
    ExpenseForest, ExpenseId, ForestError, IncomeSpec, JurisdictionTable, PersistedState,
    RepositoryError, TaxBracket, load_state_or_default,
};
use income_db_sqlite::SqliteRepositoryFactory;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Forest(#[from] ForestError),

    #[error("no expense matches id '{0}'")]
    UnknownExpense(String),

    #[error("id '{prefix}' matches {count} expenses; use more characters")]
    AmbiguousExpense { prefix: String, count: usize },

    #[error("unknown jurisdiction '{0}'; run `income states` for the list")]
    UnknownJurisdiction(String),
}

/// Every backend this binary can open.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(MemoryRepositoryFactory));
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Fields of the income declaration to change. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeUpdate {
    pub amount: Option<Decimal>,
    pub cadence: Option<Cadence>,
    pub is_gross: Option<bool>,
    pub hours_per_day: Option<Decimal>,
    pub days_per_week: Option<Decimal>,
    pub jurisdiction: Option<String>,
}

pub struct Session {
    repo: Box<dyn EstimatorRepository>,
    income: IncomeSpec,
    forest: ExpenseForest,
    brackets: Vec<TaxBracket>,
    jurisdictions: JurisdictionTable,
}

impl Session {
    /// Loads the stored state and reference tables. Empty reference tables
    /// fall back to the built-in ones.
    pub async fn open(repo: Box<dyn EstimatorRepository>) -> Result<Self, AppError> {
        let state = load_state_or_default(repo.as_ref()).await;
        let forest = ExpenseForest::from_nodes(&state.expenses);

        let mut brackets = repo.get_tax_brackets().await?;
        if brackets.is_empty() {
            warn!("no tax brackets stored; using built-in table");
            brackets = DEFAULT_TAX_BRACKETS.clone();
        }

        let stored = repo.list_jurisdictions().await?;
        let jurisdictions = if stored.is_empty() {
            warn!("no jurisdictions stored; using built-in table");
            JurisdictionTable::builtin()
        } else {
            JurisdictionTable::new(stored)
        };

        debug!(expenses = forest.len(), "session opened");
        Ok(Self {
            repo,
            income: state.income,
            forest,
            brackets,
            jurisdictions,
        })
    }

    pub fn income(&self) -> &IncomeSpec {
        &self.income
    }

    pub fn forest(&self) -> &ExpenseForest {
        &self.forest
    }

    pub fn jurisdictions(&self) -> &JurisdictionTable {
        &self.jurisdictions
    }

    pub fn result(&self) -> CalculationResult {
        ResultsComposer::new(&self.brackets, &self.jurisdictions)
            .compute(&self.income, &self.forest.snapshot())
    }

    pub async fn update_income(
        &mut self,
        update: IncomeUpdate,
    ) -> Result<(), AppError> {
        let mut income = self.income.clone();

        if let Some(code) = update.jurisdiction {
            let known = self
                .jurisdictions
                .get(&code)
                .ok_or_else(|| AppError::UnknownJurisdiction(code.clone()))?;
            income.jurisdiction = known.code.to_ascii_uppercase();
        }
        if let Some(amount) = update.amount {
            income.amount = amount;
        }
        if let Some(cadence) = update.cadence {
            income.cadence = cadence;
        }
        if let Some(is_gross) = update.is_gross {
            income.is_gross = is_gross;
        }
        if let Some(hours) = update.hours_per_day {
            income.hours_per_day = hours;
        }
        if let Some(days) = update.days_per_week {
            income.days_per_week = days;
        }

        self.income = income;
        self.save().await
    }

    /// Adds a root, or a child of the expense whose id starts with
    /// `parent`.
    pub async fn add_expense(
        &mut self,
        parent: Option<&str>,
        draft: ExpenseDraft,
    ) -> Result<ExpenseId, AppError> {
        let id = match parent {
            Some(prefix) => {
                let parent_id = self.resolve(prefix)?;
                self.forest.add_child(&parent_id, draft)?
            }
            None => self.forest.add_root(draft),
        };
        self.save().await?;
        Ok(id)
    }

    /// Removes the expense and its subtree; returns how many nodes went.
    pub async fn remove_expense(
        &mut self,
        prefix: &str,
    ) -> Result<usize, AppError> {
        let id = self.resolve(prefix)?;
        let removed = self.forest.remove(&id)?;
        self.save().await?;
        Ok(removed)
    }

    pub async fn set_expense_color(
        &mut self,
        prefix: &str,
        color: String,
    ) -> Result<(), AppError> {
        let id = self.resolve(prefix)?;
        self.forest.set_color(&id, color)?;
        self.save().await
    }

    pub async fn set_expense_amount(
        &mut self,
        prefix: &str,
        amount: Decimal,
    ) -> Result<(), AppError> {
        let id = self.resolve(prefix)?;
        self.forest.set_amount(&id, amount)?;
        self.save().await
    }

    /// Finds the single expense whose id starts with `prefix`. An exact
    /// match always wins.
    pub fn resolve(
        &self,
        prefix: &str,
    ) -> Result<ExpenseId, AppError> {
        let wanted = ExpenseId::from(prefix.trim());
        if self.forest.contains(&wanted) {
            return Ok(wanted);
        }

        let matches: Vec<ExpenseId> = self
            .forest
            .snapshot()
            .iter()
            .flat_map(collect_ids)
            .filter(|id| id.as_str().starts_with(wanted.as_str()))
            .collect();

        match matches.as_slice() {
            [] => Err(AppError::UnknownExpense(prefix.to_string())),
            [only] => Ok(only.clone()),
            many => Err(AppError::AmbiguousExpense {
                prefix: prefix.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Hands the repository back, e.g. to reopen a fresh session on it.
    pub fn into_repository(self) -> Box<dyn EstimatorRepository> {
        self.repo
    }

    async fn save(&self) -> Result<(), AppError> {
        let state = PersistedState::new(self.income.clone(), self.forest.snapshot());
        self.repo.save_state(&state).await?;
        info!(expenses = self.forest.len(), "state saved");
        Ok(())
    }
}

fn collect_ids(node: &income_core::ExpenseNode) -> Vec<ExpenseId> {
    let mut ids = vec![node.id.clone()];
    ids.extend(node.children.iter().flat_map(collect_ids));
    ids
}
