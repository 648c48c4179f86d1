//! Transport shapes for driver records.
//!
//! Field names serialize in camelCase to match the public JSON contract.

use serde::{Deserialize, Serialize};

use crate::model::driver::DriverId;

/// Driver as returned to (and accepted from) API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDto {
    /// Ignored on update; the path identity wins.
    #[serde(default)]
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Driver creation payload. Identity is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverCreateDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}
