//! Driver repository: generic CRUD plus driver-specific queries.
//!
//! # Invariants
//! - `insert_many` is all-or-nothing: one transaction per batch.
//! - `list_alphabetized` orders by first name, last name, then identity.

use crate::db::ConnectionProvider;
use crate::model::driver::Driver;
use crate::repo::base_repo::{BaseRepository, Operation, RepoResult, SqliteRepository};
use crate::repo::entity::{field_values, insert_many_sql, select_ordered_sql, Entity, EntityId};
use log::debug;
use rusqlite::{params, params_from_iter, TransactionBehavior};

/// Upper bound on value groups per INSERT statement, keeping the bound
/// parameter count well under SQLite's variable limit.
const MAX_ROWS_PER_INSERT: usize = 200;

const ALPHABETIZED_ORDER: &[&str] = &["FirstName", "LastName", Driver::ID_COLUMN];

/// Repository interface for driver persistence.
pub trait DriverRepository: BaseRepository<Driver> {
    /// Inserts complete drivers in one transaction; identities are
    /// assigned by the store and ignored on input.
    fn insert_many(&self, drivers: &[Driver]) -> RepoResult<()>;

    /// All drivers ordered by first name then last name, ascending.
    fn list_alphabetized(&self) -> RepoResult<Vec<Driver>>;
}

/// SQLite-backed driver repository.
#[derive(Clone)]
pub struct SqliteDriverRepository {
    base: SqliteRepository<Driver>,
}

impl SqliteDriverRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            base: SqliteRepository::new(provider),
        }
    }
}

impl BaseRepository<Driver> for SqliteDriverRepository {
    fn create(&self, entity: &Driver) -> RepoResult<EntityId> {
        self.base.create(entity)
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Driver>> {
        self.base.get_by_id(id)
    }

    fn get_all(&self, page_number: i64, page_size: i64) -> RepoResult<Vec<Driver>> {
        self.base.get_all(page_number, page_size)
    }

    fn update(&self, entity: &Driver) -> RepoResult<()> {
        self.base.update(entity)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        self.base.delete(id)
    }
}

impl DriverRepository for SqliteDriverRepository {
    fn insert_many(&self, drivers: &[Driver]) -> RepoResult<()> {
        if drivers.is_empty() {
            debug!("event=repo_insert_many module=repo status=noop count=0");
            return Ok(());
        }

        self.base.with_connection(Operation::InsertMany, |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            for chunk in drivers.chunks(MAX_ROWS_PER_INSERT) {
                let values = chunk.iter().flat_map(field_values::<Driver>);
                tx.execute(&insert_many_sql::<Driver>(chunk.len()), params_from_iter(values))?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn list_alphabetized(&self) -> RepoResult<Vec<Driver>> {
        self.base.with_connection(Operation::ListAlphabetized, |conn| {
            SqliteRepository::<Driver>::query_all(
                conn,
                &select_ordered_sql::<Driver>(ALPHABETIZED_ORDER),
                params![],
            )
        })
    }
}
