mod amount;
mod cadence;
mod calculation_result;
mod expense;
mod income;
mod jurisdiction;
mod persisted_state;
mod tax_bracket;

pub use cadence::{Cadence, ParseCadenceError};
pub use calculation_result::{
    CalculationResult, DisplayPeriod, ExpenseBreakdownEntry, ParseDisplayPeriodError,
    PeriodBreakdown, PeriodView,
};
pub use expense::{ExpenseDraft, ExpenseId, ExpenseNode};
pub use income::{DEFAULT_DAYS_PER_WEEK, DEFAULT_HOURS_PER_DAY, IncomeSpec, NO_JURISDICTION};
pub use jurisdiction::{DEFAULT_JURISDICTIONS, Jurisdiction, JurisdictionTable};
pub use persisted_state::{PersistedState, STATE_KEY};
pub use tax_bracket::{DEFAULT_TAX_BRACKETS, TaxBracket};
