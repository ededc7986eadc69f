pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{DEFAULT_DB_FILE, DbConfig, RepositoryFactory, RepositoryRegistry};
pub use memory::{MemoryRepository, MemoryRepositoryFactory};
pub use repository::{EstimatorRepository, RepositoryError, load_state_or_default};
