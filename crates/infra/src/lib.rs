//! Infrastructure layer: storage adapters, the order intake pipeline, config.

pub mod config;
pub mod intake;
pub mod repository;

mod integration_tests;

pub use config::{AppConfig, ConfigError, StorageConfig};
pub use intake::{IntakeError, OrderIntake};
pub use repository::{InMemoryOrderRepository, OrderRepository, RepositoryError};
#[cfg(feature = "postgres")]
pub use repository::PostgresOrderRepository;
