use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::{Jurisdiction, PersistedState, TaxBracket};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        RepositoryError::Serialization(error.to_string())
    }
}

/// Storage port for the user's state and the reference tables.
///
/// The engine never calls this; front ends load a [`PersistedState`],
/// compute, and save the edited state back.
#[async_trait]
pub trait EstimatorRepository: Send + Sync {
    // User state
    async fn load_state(&self) -> Result<Option<PersistedState>, RepositoryError>;
    async fn save_state(
        &self,
        state: &PersistedState,
    ) -> Result<(), RepositoryError>;

    // Federal brackets, ascending by limit
    async fn get_tax_brackets(&self) -> Result<Vec<TaxBracket>, RepositoryError>;
    async fn replace_tax_brackets(
        &self,
        brackets: &[TaxBracket],
    ) -> Result<(), RepositoryError>;

    // Jurisdictions
    async fn list_jurisdictions(&self) -> Result<Vec<Jurisdiction>, RepositoryError>;
    async fn replace_jurisdictions(
        &self,
        jurisdictions: &[Jurisdiction],
    ) -> Result<(), RepositoryError>;
}

/// Loads the stored state, falling back to the empty default when nothing
/// has been saved yet or the backend cannot produce it.
pub async fn load_state_or_default(repo: &dyn EstimatorRepository) -> PersistedState {
    match repo.load_state().await {
        Ok(Some(state)) => state,
        Ok(None) => PersistedState::default(),
        Err(error) => {
            warn!(%error, "failed to load stored state; using defaults");
            PersistedState::default()
        }
    }
}
