//! Generic repository contract and its SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD for any `Entity` without entity-specific SQL.
//! - Scope one store connection to each operation.
//! - Wrap every store failure with operation context.
//!
//! # Invariants
//! - Absence is `Ok(None)`, never an error.
//! - Update/delete of a missing identity is a no-op.
//! - Failures are logged once here and returned as `StorageError`.

use crate::db::{ConnectionProvider, DbError};
use crate::repo::entity::{
    delete_sql, field_values, insert_sql, page_offset, select_by_id_sql, select_page_sql,
    update_sql, Entity, EntityId,
};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::time::Instant;

pub type RepoResult<T> = Result<T, StorageError>;

/// Failure of a store call, carrying the operation it interrupted.
#[derive(Debug)]
pub struct StorageError {
    context: String,
    source: DbError,
}

impl StorageError {
    pub fn new(context: impl Into<String>, source: impl Into<DbError>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Sentence describing the interrupted operation.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn cause(&self) -> &DbError {
        &self.source
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Repository operations, used for log events and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Create,
    GetById,
    GetAll,
    Update,
    Delete,
    InsertMany,
    ListAlphabetized,
}

impl Operation {
    fn event(self) -> &'static str {
        match self {
            Self::Create => "repo_create",
            Self::GetById => "repo_get_by_id",
            Self::GetAll => "repo_get_all",
            Self::Update => "repo_update",
            Self::Delete => "repo_delete",
            Self::InsertMany => "repo_insert_many",
            Self::ListAlphabetized => "repo_list_alphabetized",
        }
    }

    fn context(self, entity: &str) -> String {
        let action = match self {
            Self::Create => format!("creating the {entity}"),
            Self::GetById => format!("retrieving the {entity}"),
            Self::GetAll => format!("retrieving the {entity}s"),
            Self::Update => format!("updating the {entity}"),
            Self::Delete => format!("deleting the {entity}"),
            Self::InsertMany => format!("inserting {entity}s"),
            Self::ListAlphabetized => format!("retrieving and alphabetizing the {entity}s"),
        };
        format!("An error occurred while {action}")
    }
}

/// Generic CRUD contract over one entity table.
pub trait BaseRepository<E: Entity> {
    /// Inserts every non-identity field and returns the assigned identity.
    fn create(&self, entity: &E) -> RepoResult<EntityId>;
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;
    /// One-based page of rows in ascending identity order.
    fn get_all(&self, page_number: i64, page_size: i64) -> RepoResult<Vec<E>>;
    fn update(&self, entity: &E) -> RepoResult<()>;
    fn delete(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed repository for any `Entity`.
pub struct SqliteRepository<E> {
    provider: ConnectionProvider,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for SqliteRepository<E> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> SqliteRepository<E> {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            provider,
            _entity: PhantomData,
        }
    }

    /// Runs `f` on a fresh connection and wraps any failure with context.
    ///
    /// The connection is dropped before returning on every path.
    pub(crate) fn with_connection<T>(
        &self,
        operation: Operation,
        f: impl FnOnce(&mut Connection) -> Result<T, DbError>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = self.provider.connect().and_then(|mut conn| f(&mut conn));

        match result {
            Ok(value) => {
                debug!(
                    "event={} module=repo status=ok entity={} duration_ms={}",
                    operation.event(),
                    E::NAME,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event={} module=repo status=error entity={} duration_ms={} error={}",
                    operation.event(),
                    E::NAME,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StorageError::new(operation.context(E::NAME), err))
            }
        }
    }

    pub(crate) fn query_all(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<E>, DbError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| E::from_row(row))?;
        let entities = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entities)
    }
}

impl<E: Entity> BaseRepository<E> for SqliteRepository<E> {
    fn create(&self, entity: &E) -> RepoResult<EntityId> {
        self.with_connection(Operation::Create, |conn| {
            conn.execute(&insert_sql::<E>(), params_from_iter(field_values(entity)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        self.with_connection(Operation::GetById, |conn| {
            let entity = conn
                .query_row(&select_by_id_sql::<E>(), [id], |row| E::from_row(row))
                .optional()?;
            Ok(entity)
        })
    }

    fn get_all(&self, page_number: i64, page_size: i64) -> RepoResult<Vec<E>> {
        let offset = page_offset(page_number, page_size);
        self.with_connection(Operation::GetAll, |conn| {
            Self::query_all(conn, &select_page_sql::<E>(), params![page_size, offset])
        })
    }

    fn update(&self, entity: &E) -> RepoResult<()> {
        let mut values = field_values(entity);
        values.push(Value::Integer(entity.id()));
        self.with_connection(Operation::Update, |conn| {
            let changed = conn.execute(&update_sql::<E>(), params_from_iter(values))?;
            if changed == 0 {
                debug!(
                    "event=repo_update module=repo status=noop entity={} id={}",
                    E::NAME,
                    entity.id()
                );
            }
            Ok(())
        })
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        self.with_connection(Operation::Delete, |conn| {
            conn.execute(&delete_sql::<E>(), [id])?;
            Ok(())
        })
    }
}
