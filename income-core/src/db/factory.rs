use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{EstimatorRepository, RepositoryError};

/// Backend-agnostic connection configuration.
///
/// `backend` must match the [`RepositoryFactory::backend_name`] of a
/// registered factory. `connection_string` is handed to that factory as
/// is; what it means is up to the backend.
///
/// | backend  | connection_string examples       |
/// |----------|----------------------------------|
/// | `memory` | ignored                          |
/// | `sqlite` | `income.db`, `:memory:`          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"sqlite"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
}

/// File the SQLite backend opens when nothing else is configured.
pub const DEFAULT_DB_FILE: &str = "income.db";

impl DbConfig {
    /// Backend names are stored trimmed and lowercase, so `--backend SQLite`
    /// selects the `sqlite` factory.
    pub fn new(
        backend: &str,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.trim().to_ascii_lowercase(),
            connection_string: connection_string.into(),
        }
    }

    /// A throwaway store that lives for one process.
    pub fn memory() -> Self {
        Self::new("memory", "")
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new("sqlite", DEFAULT_DB_FILE)
    }
}

/// One implementation per storage backend, registered with a
/// [`RepositoryRegistry`] at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the store and return a ready-to-use repository.
    /// Migrations, if any, run here.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimatorRepository>, RepositoryError>;
}

/// Registry of [`RepositoryFactory`] instances, keyed by backend name.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.backend`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] if no factory has that name.
    /// * Whatever the chosen factory returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimatorRepository>, RepositoryError> {
        let backend = config.backend.trim().to_ascii_lowercase();
        let factory = self
            .factories
            .get(backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        debug!(%backend, "opening repository");
        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
