//! Driver storage entity.

use rusqlite::types::Value;
use rusqlite::Row;

use crate::repo::entity::{Entity, EntityId, Field};

/// Store-assigned identity of a driver row.
pub type DriverId = EntityId;

/// Identity value carried by a driver that has not been persisted yet.
pub const UNASSIGNED_ID: DriverId = 0;

/// Driver record as stored in the `Drivers` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl Driver {
    /// Creates a driver that has not been persisted yet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }
}

impl Entity for Driver {
    const NAME: &'static str = "Driver";
    const TABLE: &'static str = "Drivers";

    const FIELDS: &'static [Field<Self>] = &[
        Field {
            column: "FirstName",
            value: |driver| Value::Text(driver.first_name.clone()),
        },
        Field {
            column: "LastName",
            value: |driver| Value::Text(driver.last_name.clone()),
        },
        Field {
            column: "Email",
            value: |driver| Value::Text(driver.email.clone()),
        },
        Field {
            column: "PhoneNumber",
            value: |driver| Value::Text(driver.phone_number.clone()),
        },
    ];

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(Self::ID_COLUMN)?,
            first_name: row.get("FirstName")?,
            last_name: row.get("LastName")?,
            email: row.get("Email")?,
            phone_number: row.get("PhoneNumber")?,
        })
    }
}
