//! Mapper lookup by runtime type or type tag.

use super::person_mapper::{PersonMapper, PERSON_TABLE};
use super::{MapperError, MapperResult, RecordMapper};
use crate::db::migrations::{latest_version, schema_version};
use crate::model::domain_object::{DomainObject, RecordId};
use crate::model::person::{PersonOfInterest, PERSON_OF_INTEREST_TAG};
use rusqlite::Connection;

/// Mapper resolved by the registry, one variant per mapped entity type.
#[derive(Debug, Clone, Copy)]
pub enum Mapper<'conn> {
    PersonOfInterest(PersonMapper<'conn>),
}

impl<'conn> Mapper<'conn> {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::PersonOfInterest(_) => PERSON_OF_INTEREST_TAG,
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::PersonOfInterest(mapper) => mapper.table_name(),
        }
    }

    pub fn connection(&self) -> &'conn Connection {
        match self {
            Self::PersonOfInterest(mapper) => mapper.connection(),
        }
    }

    /// Inserts a type-erased object and returns its generated id.
    pub fn insert_object(&self, obj: &dyn DomainObject) -> MapperResult<RecordId> {
        match self {
            Self::PersonOfInterest(mapper) => mapper.insert(downcast(obj)?),
        }
    }

    pub fn update_object(&self, obj: &dyn DomainObject) -> MapperResult<()> {
        match self {
            Self::PersonOfInterest(mapper) => mapper.update(downcast(obj)?),
        }
    }

    pub fn delete_object(&self, obj: &dyn DomainObject) -> MapperResult<()> {
        match self {
            Self::PersonOfInterest(mapper) => mapper.delete(downcast(obj)?),
        }
    }
}

fn downcast<T: DomainObject>(obj: &dyn DomainObject) -> MapperResult<&T> {
    obj.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| MapperError::UnmappedType(obj.type_tag().to_string()))
}

/// Registry of mappers bound to one shared connection.
///
/// Mapper construction is free, so mappers are built per lookup; every mapper
/// handed out targets the registry's connection.
#[derive(Debug, Clone, Copy)]
pub struct MapperRegistry<'conn> {
    conn: &'conn Connection,
}

impl<'conn> MapperRegistry<'conn> {
    /// Type tags with a registered mapper.
    pub const MAPPED_TYPES: &'static [&'static str] = &[PERSON_OF_INTEREST_TAG];

    /// Creates a registry after validating the connection schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when a mapped table does not exist.
    pub fn try_new(conn: &'conn Connection) -> MapperResult<Self> {
        let expected_version = latest_version();
        let actual_version = schema_version(conn)?;
        if actual_version != expected_version {
            return Err(MapperError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [PERSON_TABLE],
            |row| row.get(0),
        )?;
        if !table_exists {
            return Err(MapperError::MissingRequiredTable(PERSON_TABLE));
        }

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    /// Resolves the mapper servicing `obj`'s concrete type.
    pub fn get_mapper(&self, obj: &dyn DomainObject) -> MapperResult<Mapper<'conn>> {
        if obj.as_any().is::<PersonOfInterest>() {
            return Ok(Mapper::PersonOfInterest(self.person_mapper()));
        }
        Err(MapperError::UnmappedType(obj.type_tag().to_string()))
    }

    /// Resolves a mapper by explicit type tag.
    pub fn get_mapper_for_type(&self, tag: &str) -> MapperResult<Mapper<'conn>> {
        match tag.trim() {
            PERSON_OF_INTEREST_TAG => Ok(Mapper::PersonOfInterest(self.person_mapper())),
            other => Err(MapperError::UnmappedType(other.to_string())),
        }
    }

    pub fn person_mapper(&self) -> PersonMapper<'conn> {
        PersonMapper::new(self.conn)
    }
}
