//! SQLite mapper for `person_of_interest` rows.

use super::{MapperError, MapperResult, RecordMapper, WriteOp};
use crate::db::DbError;
use crate::model::domain_object::{DomainObject, RecordId};
use crate::model::person::PersonOfInterest;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub const PERSON_TABLE: &str = "person_of_interest";

const PERSON_SELECT_SQL: &str = "SELECT id, name FROM person_of_interest";

/// Person mapper bound to the shared connection.
#[derive(Debug, Clone, Copy)]
pub struct PersonMapper<'conn> {
    conn: &'conn Connection,
}

impl<'conn> PersonMapper<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    fn execute_write(
        &self,
        op: WriteOp,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> MapperResult<usize> {
        match self.conn.execute(sql, params) {
            Ok(changed) => {
                debug!(
                    "event=mapper_write module=mapper status=ok op={op} table={PERSON_TABLE} changed={changed}"
                );
                Ok(changed)
            }
            Err(err) => {
                error!(
                    "event=mapper_write module=mapper status=error op={op} table={PERSON_TABLE} error={err}"
                );
                Err(MapperError::WriteFailed {
                    op,
                    table: PERSON_TABLE,
                    source: DbError::Sqlite(err),
                })
            }
        }
    }
}

impl RecordMapper for PersonMapper<'_> {
    type Entity = PersonOfInterest;

    fn table_name(&self) -> &'static str {
        PERSON_TABLE
    }

    fn all(&self) -> MapperResult<Vec<PersonOfInterest>> {
        let mut stmt = self.conn.prepare(&format!("{PERSON_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();

        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }

        Ok(persons)
    }

    fn find_by_key(&self, id: RecordId) -> MapperResult<PersonOfInterest> {
        self.conn
            .query_row(
                &format!("{PERSON_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_person_row,
            )
            .optional()?
            .ok_or(MapperError::RecordNotFound {
                table: PERSON_TABLE,
                id,
            })
    }

    fn insert(&self, obj: &PersonOfInterest) -> MapperResult<RecordId> {
        self.execute_write(
            WriteOp::Insert,
            "INSERT INTO person_of_interest (name) VALUES (?1);",
            params![obj.name.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, obj: &PersonOfInterest) -> MapperResult<()> {
        let id = require_id(obj, WriteOp::Update)?;
        let changed = self.execute_write(
            WriteOp::Update,
            "UPDATE person_of_interest SET name = ?1 WHERE id = ?2;",
            params![obj.name.as_str(), id],
        )?;
        ensure_changed(changed, id)
    }

    fn delete(&self, obj: &PersonOfInterest) -> MapperResult<()> {
        let id = require_id(obj, WriteOp::Delete)?;
        let changed = self.execute_write(
            WriteOp::Delete,
            "DELETE FROM person_of_interest WHERE id = ?1;",
            [id],
        )?;
        ensure_changed(changed, id)
    }
}

fn parse_person_row(row: &Row<'_>) -> rusqlite::Result<PersonOfInterest> {
    let id: RecordId = row.get("id")?;
    let name: String = row.get("name")?;
    Ok(PersonOfInterest::with_id(id, name))
}

fn require_id(obj: &PersonOfInterest, op: WriteOp) -> MapperResult<RecordId> {
    obj.id().ok_or(MapperError::MissingIdentifier {
        op,
        table: PERSON_TABLE,
    })
}

fn ensure_changed(changed: usize, id: RecordId) -> MapperResult<()> {
    if changed == 0 {
        return Err(MapperError::RecordNotFound {
            table: PERSON_TABLE,
            id,
        });
    }
    Ok(())
}
