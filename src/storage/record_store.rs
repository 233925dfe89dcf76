//! Generic SQLite record store
//!
//! One `RecordStore` per collection, each backed by its own database file.
//! A store holds no open connection: every operation opens a handle, does its
//! work and drops the handle before returning, so a store can be shared
//! freely between concurrent requests and every read sees the latest
//! committed state.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, ToSql};

use super::layout::StoreName;
use crate::{Error, Result};

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Describes one collection: its table, columns, defaults and ordering.
pub trait RecordSchema {
    const STORE: StoreName;
    const TABLE: &'static str;
    const CREATE_TABLE: &'static str;
    const INDEXES: &'static [&'static str];

    /// Columns written on insert, in the order `bind` produces values.
    /// The `timestamp` column is appended by the store.
    const INSERT_COLUMNS: &'static [&'static str];

    /// Columns read back, in the order `from_row` expects them
    const SELECT_COLUMNS: &'static str;

    /// Direction of the default listing by timestamp
    const ORDER: SortOrder;

    /// Reported when an insert hits a UNIQUE constraint
    const CONFLICT_MESSAGE: &'static str = "Record already exists";

    type Record;
    type Input;

    fn validate(input: &Self::Input) -> Result<()>;

    /// Values for `INSERT_COLUMNS`, with defaults applied
    fn bind(input: &Self::Input) -> Vec<Value>;

    fn from_row(row: &Row) -> rusqlite::Result<Self::Record>;
}

/// A collection whose records reference a parent by id.
pub trait ChildSchema: RecordSchema {
    const PARENT_COLUMN: &'static str;
}

/// A collection that exposes delete-by-id.
pub trait Deletable: RecordSchema {}

/// SQLite-backed store for one collection
pub struct RecordStore<S: RecordSchema> {
    path: PathBuf,
    _schema: PhantomData<fn() -> S>,
}

impl<S: RecordSchema> Clone for RecordStore<S> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S: RecordSchema> std::fmt::Debug for RecordStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("store", &S::STORE)
            .field("path", &self.path)
            .finish()
    }
}

impl<S: RecordSchema> RecordStore<S> {
    /// Open a store (creates the database file and table if missing)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            _schema: PhantomData,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a fresh handle on the store's database
    pub(crate) fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Attach this store's database to a connection of another store
    pub(crate) fn attach_to(&self, conn: &Connection, alias: &str) -> Result<()> {
        let path = self.path.to_string_lossy().into_owned();
        conn.execute(&format!("ATTACH DATABASE ?1 AS {}", alias), [&path])?;
        Ok(())
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(S::CREATE_TABLE, [])?;
        for stmt in S::INDEXES {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Operations ==========

    /// Validate and insert a record, returning it with its assigned id and timestamp
    pub fn insert(&self, input: &S::Input) -> Result<S::Record> {
        S::validate(input)?;
        let conn = self.connect()?;
        Self::insert_on(&conn, input, Utc::now())
    }

    /// Insert on an existing connection (or transaction). Does not validate.
    pub(crate) fn insert_on(
        conn: &Connection,
        input: &S::Input,
        timestamp: DateTime<Utc>,
    ) -> Result<S::Record> {
        let mut columns = S::INSERT_COLUMNS.to_vec();
        columns.push("timestamp");
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            S::TABLE,
            columns.join(", "),
            placeholders.join(", "),
            S::SELECT_COLUMNS,
        );

        let values = S::bind(input);
        let mut params: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        params.push(&timestamp);

        conn.query_row(&sql, params.as_slice(), |row| S::from_row(row))
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Error::Conflict(S::CONFLICT_MESSAGE.to_string())
                }
                other => other.into(),
            })
    }

    /// All records, ordered by timestamp in the schema's direction
    pub fn list(&self) -> Result<Vec<S::Record>> {
        let conn = self.connect()?;
        let order = S::ORDER.as_sql();
        let sql = format!(
            "SELECT {} FROM {} ORDER BY timestamp {}, id {}",
            S::SELECT_COLUMNS,
            S::TABLE,
            order,
            order
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], |row| S::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Count all records
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", S::TABLE), [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }
}

impl<S: ChildSchema> RecordStore<S> {
    /// Records referencing `parent_id`, ordered by timestamp in the schema's direction
    pub fn list_by_parent(&self, parent_id: i64) -> Result<Vec<S::Record>> {
        let conn = self.connect()?;
        let order = S::ORDER.as_sql();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY timestamp {}, id {}",
            S::SELECT_COLUMNS,
            S::TABLE,
            S::PARENT_COLUMN,
            order,
            order
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([parent_id], |row| S::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    pub fn count_by_parent(&self, parent_id: i64) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", S::TABLE, S::PARENT_COLUMN),
            [parent_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl<S: Deletable> RecordStore<S> {
    /// Remove a record. Deleting an id that does not exist is not an error.
    pub fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.connect()?;
        let removed = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", S::TABLE), [id])?;
        tracing::debug!("Deleted {} row(s) with id {} from {}", removed, id, S::STORE);
        Ok(())
    }
}
