//! Calculation engine for income and expense estimation.
//!
//! Every function here is pure: it takes plain values and returns plain
//! values, with no I/O and no hidden state. Tables (tax brackets,
//! jurisdictions) are either injected or taken from the built-in defaults.
//!
//! | Module        | Responsibility                                   |
//! |---------------|--------------------------------------------------|
//! | `cadence`     | annualizing and restating cadence-tagged amounts |
//! | `federal_tax` | progressive bracket walk and table validation    |
//! | `state_tax`   | flat jurisdiction rate                           |
//! | `expenses`    | subtree totals, breakdown, impact colors         |
//! | `results`     | composing the full [`CalculationResult`]         |
//!
//! [`CalculationResult`]: crate::models::CalculationResult

pub mod common;

mod cadence;
mod expenses;
mod federal_tax;
mod results;
mod state_tax;

pub use cadence::{from_annual, to_annual, to_annual_default};
pub use expenses::{
    annual_value, default_color, display_total, flatten, impact_color, row_total, share_percent,
    spectral_color,
};
pub use federal_tax::{BracketTableError, FederalTaxCalculator, federal_tax, validate_brackets};
pub use results::{ResultsComposer, compute};
pub use state_tax::state_tax;
