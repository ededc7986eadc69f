//! Process-local backend.
//!
//! Holds the state as a serialized payload, exactly as a key-value store
//! would, so loading goes through the same lenient parsing as any other
//! backend. Reference tables start out as the built-in defaults.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{EstimatorRepository, RepositoryError};
use crate::models::{
    DEFAULT_JURISDICTIONS, DEFAULT_TAX_BRACKETS, Jurisdiction, PersistedState, TaxBracket,
};

#[derive(Debug)]
struct Store {
    payload: Option<String>,
    brackets: Vec<TaxBracket>,
    jurisdictions: Vec<Jurisdiction>,
}

#[derive(Debug)]
pub struct MemoryRepository {
    store: Mutex<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store {
                payload: None,
                brackets: DEFAULT_TAX_BRACKETS.clone(),
                jurisdictions: DEFAULT_JURISDICTIONS.iter().cloned().collect(),
            }),
        }
    }

    /// A repository whose stored payload is `payload` verbatim.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let repo = Self::new();
        if let Ok(mut store) = repo.store.lock() {
            store.payload = Some(payload.into());
        }
        repo
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, RepositoryError> {
        self.store
            .lock()
            .map_err(|e| RepositoryError::Database(format!("memory store poisoned: {e}")))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EstimatorRepository for MemoryRepository {
    async fn load_state(&self) -> Result<Option<PersistedState>, RepositoryError> {
        let store = self.lock()?;
        Ok(store.payload.as_deref().map(PersistedState::from_json))
    }

    async fn save_state(
        &self,
        state: &PersistedState,
    ) -> Result<(), RepositoryError> {
        let payload = state.to_json()?;
        debug!(bytes = payload.len(), "saving state in memory");
        self.lock()?.payload = Some(payload);
        Ok(())
    }

    async fn get_tax_brackets(&self) -> Result<Vec<TaxBracket>, RepositoryError> {
        Ok(self.lock()?.brackets.clone())
    }

    async fn replace_tax_brackets(
        &self,
        brackets: &[TaxBracket],
    ) -> Result<(), RepositoryError> {
        self.lock()?.brackets = brackets.to_vec();
        Ok(())
    }

    async fn list_jurisdictions(&self) -> Result<Vec<Jurisdiction>, RepositoryError> {
        Ok(self.lock()?.jurisdictions.clone())
    }

    async fn replace_jurisdictions(
        &self,
        jurisdictions: &[Jurisdiction],
    ) -> Result<(), RepositoryError> {
        self.lock()?.jurisdictions = jurisdictions.to_vec();
        Ok(())
    }
}

/// Registered as `"memory"`. The connection string is ignored.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn EstimatorRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::new()))
    }
}
