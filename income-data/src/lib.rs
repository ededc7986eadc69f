//! CSV loaders for the reference tables the estimator computes against.

mod decimal;
mod jurisdictions;
mod loader;

pub use jurisdictions::{JurisdictionLoader, JurisdictionLoaderError, JurisdictionRecord};
pub use loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
