//! HTTP surface for the drivers service.
//!
//! # Responsibility
//! - Route `/api/driver` requests into `driver_core` services.
//! - Own request validation, status mapping and runtime configuration.

pub mod api;
pub mod config;
pub mod error;
pub mod validation;

pub use api::{router, SharedDriverService, INSERT_RANDOM_COUNT};
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
