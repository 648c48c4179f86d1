//! Connection provider for the drivers store.
//!
//! # Responsibility
//! - Parse `Data Source=...` style connection strings.
//! - Bootstrap the database file once (pragmas + migrations).
//! - Open short-lived connections for individual repository operations.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - A provider only exists for a database whose migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const DATA_SOURCE_KEYS: &[&str] = &["data source", "datasource", "filename"];

/// Opens scoped SQLite connections against one database file.
///
/// Cloning is cheap; every clone points at the same file.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    path: PathBuf,
}

impl ConnectionProvider {
    /// Resolves `connection_string` and bootstraps the database it names.
    ///
    /// # Side effects
    /// - Creates the database file when missing.
    /// - Applies pending migrations.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(connection_string: &str) -> DbResult<Self> {
        let path = parse_connection_string(connection_string)?;
        Self::open_path(path)
    }

    /// Bootstraps the database at `path` without connection string parsing.
    pub fn open_path(path: impl AsRef<Path>) -> DbResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();
        info!(
            "event=db_open module=db status=start path={}",
            path.display()
        );

        let result = Connection::open(&path)
            .map_err(DbError::from)
            .and_then(|mut conn| {
                configure_connection(&conn)?;
                apply_migrations(&mut conn)
            });

        match result {
            Ok(()) => {
                info!(
                    "event=db_open module=db status=ok path={} duration_ms={}",
                    path.display(),
                    started_at.elapsed().as_millis()
                );
                Ok(Self { path })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error path={} duration_ms={} error_code=db_bootstrap_failed error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Opens a connection for a single operation.
    ///
    /// The caller owns the connection; dropping it closes the handle.
    pub fn connect(&self) -> DbResult<Connection> {
        let conn = Connection::open(&self.path)?;
        configure_connection(&conn)?;
        debug!("event=db_connect module=db status=ok");
        Ok(conn)
    }

    /// Returns the database file this provider connects to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Extracts the database path from a connection string.
///
/// Accepts a bare path or `key=value;` pairs where one key is
/// `Data Source` (case-insensitive). Other keys are ignored.
///
/// # Errors
/// - Empty input or an empty data source.
/// - Pair syntax without a data source key.
/// - `:memory:`, which cannot be shared across scoped connections.
pub fn parse_connection_string(connection_string: &str) -> DbResult<PathBuf> {
    let trimmed = connection_string.trim();
    if trimmed.is_empty() {
        return Err(DbError::InvalidConnectionString(
            "connection string cannot be empty".to_string(),
        ));
    }

    let source = if trimmed.contains('=') {
        trimmed
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| {
                let key = key.trim().to_ascii_lowercase();
                DATA_SOURCE_KEYS.contains(&key.as_str())
            })
            .map(|(_, value)| value.trim())
            .ok_or_else(|| {
                DbError::InvalidConnectionString(format!(
                    "missing `Data Source` in `{trimmed}`"
                ))
            })?
    } else {
        trimmed
    };

    if source.is_empty() {
        return Err(DbError::InvalidConnectionString(
            "data source cannot be empty".to_string(),
        ));
    }
    if source.eq_ignore_ascii_case(":memory:") {
        return Err(DbError::InvalidConnectionString(
            "in-memory databases are not supported with per-operation connections".to_string(),
        ));
    }

    Ok(PathBuf::from(source))
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_connection_string;
    use crate::db::DbError;
    use std::path::PathBuf;

    #[test]
    fn parses_ado_style_data_source() {
        let path = parse_connection_string("Data Source=drivers.db").unwrap();
        assert_eq!(path, PathBuf::from("drivers.db"));
    }

    #[test]
    fn data_source_key_is_case_insensitive_and_other_keys_are_ignored() {
        let path = parse_connection_string("Mode=ReadWriteCreate; data source = /tmp/a.db ;").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a.db"));
    }

    #[test]
    fn bare_path_is_accepted() {
        let path = parse_connection_string("  ./local.sqlite3 ").unwrap();
        assert_eq!(path, PathBuf::from("./local.sqlite3"));
    }

    #[test]
    fn rejects_empty_missing_and_memory_sources() {
        for input in ["", "   ", "Mode=Memory", "Data Source=", "Data Source=:memory:"] {
            let err = parse_connection_string(input).unwrap_err();
            assert!(
                matches!(err, DbError::InvalidConnectionString(_)),
                "unexpected error for `{input}`: {err}"
            );
        }
    }
}
