//! Storage entities and their transport-facing shapes.
//!
//! # Responsibility
//! - Define the `Driver` record persisted in the `Drivers` table.
//! - Define DTOs exchanged with the API boundary.
//!
//! # Invariants
//! - Identity is assigned by the store and never reused.
//! - DTOs carry no behavior beyond field-for-field data.

pub mod driver;
pub mod dto;
