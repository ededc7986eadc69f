pub mod calculations;
pub mod db;
pub mod forest;
pub mod models;

pub use db::{
    DbConfig, EstimatorRepository, MemoryRepository, RepositoryError, RepositoryFactory,
    RepositoryRegistry, load_state_or_default,
};
pub use forest::{ExpenseForest, ForestError};
pub use models::*;
