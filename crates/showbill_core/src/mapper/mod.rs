//! Data-mapper layer between domain objects and relational rows.
//!
//! # Responsibility
//! - Define the per-entity mapper contract.
//! - Resolve mappers for staged objects through [`MapperRegistry`].
//!
//! # Invariants
//! - Mappers hold no row cache; every call hits the connection.
//! - Every write runs in autocommit mode and is durable on return.
//! - Writes with no affected row report `RecordNotFound`.

mod person_mapper;
mod registry;

pub use person_mapper::{PersonMapper, PERSON_TABLE};
pub use registry::{Mapper, MapperRegistry};

use crate::db::DbError;
use crate::model::domain_object::{DomainObject, RecordId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MapperResult<T> = Result<T, MapperError>;

/// Mapper write operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOp {
    Insert,
    Update,
    Delete,
}

impl WriteOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for WriteOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum MapperError {
    /// Point lookup, update or delete matched no row.
    RecordNotFound { table: &'static str, id: RecordId },
    /// The store rejected a write.
    WriteFailed {
        op: WriteOp,
        table: &'static str,
        source: DbError,
    },
    /// Update/delete requested for an object that was never persisted.
    MissingIdentifier { op: WriteOp, table: &'static str },
    /// No mapper is registered for this entity type.
    UnmappedType(String),
    /// Read path failure.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// A mapped table is missing from the connection.
    MissingRequiredTable(&'static str),
}

impl Display for MapperError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordNotFound { table, id } => {
                write!(f, "record not found: id={id} table={table}")
            }
            Self::WriteFailed { op, table, source } => {
                write!(f, "db {op} error on `{table}`: {source}")
            }
            Self::MissingIdentifier { op, table } => {
                write!(f, "cannot {op} `{table}` row: object has no id")
            }
            Self::UnmappedType(tag) => write!(f, "no mapper registered for type `{tag}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "mapper registry requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "mapper registry requires table `{table}`")
            }
        }
    }
}

impl Error for MapperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WriteFailed { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::RecordNotFound { .. }
            | Self::MissingIdentifier { .. }
            | Self::UnmappedType(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for MapperError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MapperError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Translator between one entity type and one table.
pub trait RecordMapper {
    type Entity: DomainObject;

    fn table_name(&self) -> &'static str;

    /// Every row, in storage order.
    fn all(&self) -> MapperResult<Vec<Self::Entity>>;

    fn find_by_key(&self, id: RecordId) -> MapperResult<Self::Entity>;

    /// Inserts the non-key fields and returns the generated id.
    ///
    /// `obj` itself is left untouched.
    fn insert(&self, obj: &Self::Entity) -> MapperResult<RecordId>;

    fn update(&self, obj: &Self::Entity) -> MapperResult<()>;

    fn delete(&self, obj: &Self::Entity) -> MapperResult<()>;
}
