//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Map between storage entities and transport DTOs.
//! - Host driver domain logic (synthetic data, name alphabetization).

pub mod base_service;
pub mod driver_service;
