//! Field-descriptor tables and the SQL they generate.
//!
//! # Responsibility
//! - Describe an entity's columns once, as ordered `{column, accessor}` pairs.
//! - Derive every CRUD statement from that description.
//!
//! # Invariants
//! - Only descriptor column names and table names are interpolated into SQL;
//!   every value is a positional parameter.
//! - `FIELDS` never contains the identity column.
//! - Statement column order always matches `FIELDS` order, so bind values
//!   produced by `field_values` line up with the placeholders.

use rusqlite::types::Value;
use rusqlite::Row;

/// Store-assigned integer identity shared by all entities.
pub type EntityId = i64;

/// One persisted column of `E` and how to read its value.
pub struct Field<E> {
    pub column: &'static str,
    pub value: fn(&E) -> Value,
}

/// A record type that maps onto one table.
pub trait Entity: Sized + 'static {
    /// Human-readable entity name used in error and log messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    const ID_COLUMN: &'static str = "Id";
    /// Non-identity columns in statement order.
    const FIELDS: &'static [Field<Self>];

    fn id(&self) -> EntityId;

    /// Decodes a row selected with `select_columns::<Self>()`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Bind values for every non-identity field, in `FIELDS` order.
pub fn field_values<E: Entity>(entity: &E) -> Vec<Value> {
    E::FIELDS.iter().map(|field| (field.value)(entity)).collect()
}

/// `Id, Col1, Col2, ...`
pub fn select_columns<E: Entity>() -> String {
    std::iter::once(E::ID_COLUMN)
        .chain(E::FIELDS.iter().map(|field| field.column))
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_columns<E: Entity>() -> String {
    E::FIELDS
        .iter()
        .map(|field| field.column)
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholder_group(first: usize, count: usize) -> String {
    let placeholders = (first..first + count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("({placeholders})")
}

pub fn insert_sql<E: Entity>() -> String {
    insert_many_sql::<E>(1)
}

/// Multi-row INSERT with `rows` value groups.
pub fn insert_many_sql<E: Entity>(rows: usize) -> String {
    let width = E::FIELDS.len();
    let groups = (0..rows)
        .map(|row| placeholder_group(row * width + 1, width))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES {groups};",
        E::TABLE,
        insert_columns::<E>()
    )
}

pub fn select_by_id_sql<E: Entity>() -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?1;",
        select_columns::<E>(),
        E::TABLE,
        E::ID_COLUMN
    )
}

/// Paged select ordered by identity; binds `?1 = limit`, `?2 = offset`.
pub fn select_page_sql<E: Entity>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {} ASC LIMIT ?1 OFFSET ?2;",
        select_columns::<E>(),
        E::TABLE,
        E::ID_COLUMN
    )
}

/// Unpaged select ordered by the given columns, ascending.
pub fn select_ordered_sql<E: Entity>(order_by: &[&str]) -> String {
    let order = order_by
        .iter()
        .map(|column| format!("{column} ASC"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {} FROM {} ORDER BY {order};",
        select_columns::<E>(),
        E::TABLE
    )
}

/// UPDATE of every field; identity is the last parameter.
pub fn update_sql<E: Entity>() -> String {
    let assignments = E::FIELDS
        .iter()
        .enumerate()
        .map(|(index, field)| format!("{} = ?{}", field.column, index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE {} = ?{};",
        E::TABLE,
        E::ID_COLUMN,
        E::FIELDS.len() + 1
    )
}

pub fn delete_sql<E: Entity>() -> String {
    format!("DELETE FROM {} WHERE {} = ?1;", E::TABLE, E::ID_COLUMN)
}

/// Zero-based row offset for a one-based page number.
///
/// Saturates at the `i64` bounds; SQLite reads a negative offset as zero.
pub fn page_offset(page_number: i64, page_size: i64) -> i64 {
    page_number.saturating_sub(1).saturating_mul(page_size)
}
