//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Generate entity SQL from per-type field descriptors.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs report absence as `None`, not as an error.
//! - Every store failure surfaces as `StorageError` with operation context.

pub mod base_repo;
pub mod driver_repo;
pub mod entity;
