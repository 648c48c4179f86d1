//! Core domain logic for the drivers service.
//! This crate owns persistence, mapping and driver business rules; HTTP
//! concerns live in `driver_api`.

pub mod db;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ConnectionProvider, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mapping::DtoMapping;
pub use model::driver::{Driver, DriverId};
pub use model::dto::{DriverCreateDto, DriverDto};
pub use repo::base_repo::{BaseRepository, RepoResult, SqliteRepository, StorageError};
pub use repo::driver_repo::{DriverRepository, SqliteDriverRepository};
pub use repo::entity::{Entity, EntityId, Field};
pub use service::base_service::{BaseService, EntityService};
pub use service::driver_service::{alphabetize_name, DriverService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
