//! Unit of Work scope and the context slot holding the active scope.

use super::staging::{StagedAs, StagingSet};
use crate::mapper::{MapperError, MapperRegistry, MapperResult, WriteOp};
use crate::model::domain_object::{ObjectKey, SharedObject};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type UowResult<T> = Result<T, UowError>;

#[derive(Debug)]
pub enum UowError {
    /// Staging or commit attempted before `start_new_scope`.
    NoActiveScope,
    /// Objects are staged but no mapper registry was bound.
    NoMapperRegistry,
    /// At least one staged object failed to flush.
    Commit(CommitError),
}

impl Display for UowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveScope => write!(f, "no active unit of work scope"),
            Self::NoMapperRegistry => write!(f, "unit of work has no mapper registry"),
            Self::Commit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Commit(err) => Some(err),
            Self::NoActiveScope | Self::NoMapperRegistry => None,
        }
    }
}

impl From<CommitError> for UowError {
    fn from(value: CommitError) -> Self {
        Self::Commit(value)
    }
}

/// Successful writes of one commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl CommitSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }

    fn record(&mut self, op: WriteOp) {
        match op {
            WriteOp::Insert => self.inserted += 1,
            WriteOp::Update => self.updated += 1,
            WriteOp::Delete => self.deleted += 1,
        }
    }
}

/// One staged object that could not be flushed.
#[derive(Debug)]
pub struct CommitFailure {
    pub key: ObjectKey,
    pub type_tag: &'static str,
    pub op: WriteOp,
    pub error: MapperError,
}

/// Every failure of one commit, in processing order, plus what did succeed.
#[derive(Debug)]
pub struct CommitError {
    pub summary: CommitSummary,
    pub failures: Vec<CommitFailure>,
}

impl CommitError {
    pub fn first(&self) -> Option<&CommitFailure> {
        self.failures.first()
    }
}

impl Display for CommitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "commit finished with {} failure(s)", self.failures.len())?;
        if let Some(first) = self.first() {
            write!(
                f,
                "; first: {} {} {}: {}",
                first.op, first.type_tag, first.key, first.error
            )?;
        }
        Ok(())
    }
}

impl Error for CommitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.first().map(|failure| &failure.error as &(dyn Error + 'static))
    }
}

/// One scope of staged changes.
#[derive(Debug, Default)]
pub struct UnitOfWork<'conn> {
    new_objects: StagingSet,
    dirty_objects: StagingSet,
    deleted_objects: StagingSet,
    registry: Option<MapperRegistry<'conn>>,
}

impl<'conn> UnitOfWork<'conn> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the registry used to resolve mappers at commit time.
    pub fn set_mapper_registry(&mut self, registry: MapperRegistry<'conn>) {
        self.registry = Some(registry);
    }

    pub fn mapper_registry(&self) -> Option<&MapperRegistry<'conn>> {
        self.registry.as_ref()
    }

    pub fn register_new(&mut self, object: SharedObject) {
        self.stage(StagedAs::New, object);
    }

    pub fn register_dirty(&mut self, object: SharedObject) {
        self.stage(StagedAs::Dirty, object);
    }

    pub fn register_deleted(&mut self, object: SharedObject) {
        self.stage(StagedAs::Deleted, object);
    }

    pub fn new_objects(&self) -> &StagingSet {
        &self.new_objects
    }

    pub fn dirty_objects(&self) -> &StagingSet {
        &self.dirty_objects
    }

    pub fn deleted_objects(&self) -> &StagingSet {
        &self.deleted_objects
    }

    /// Staging set currently holding `key`, if any.
    pub fn staged_as(&self, key: ObjectKey) -> Option<StagedAs> {
        [StagedAs::New, StagedAs::Dirty, StagedAs::Deleted]
            .into_iter()
            .find(|state| self.staging_set(*state).contains(key))
    }

    pub fn staged_len(&self) -> usize {
        self.new_objects.len() + self.dirty_objects.len() + self.deleted_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged_len() == 0
    }

    /// Flushes staged objects: inserts, then updates, then deletes.
    ///
    /// Generated ids are written back onto inserted objects. All staging sets
    /// are cleared whatever the individual outcomes.
    ///
    /// # Errors
    /// - `NoMapperRegistry` when objects are staged and no registry is bound;
    ///   staging is kept intact in that case.
    /// - `Commit` carrying every per-object failure.
    pub fn commit(&mut self) -> UowResult<CommitSummary> {
        if self.is_empty() {
            debug!("event=uow_commit module=uow status=ok staged=0");
            return Ok(CommitSummary::default());
        }

        let Some(registry) = self.registry else {
            error!(
                "event=uow_commit module=uow status=error error_code=no_mapper_registry staged={}",
                self.staged_len()
            );
            return Err(UowError::NoMapperRegistry);
        };

        let started_at = Instant::now();
        info!(
            "event=uow_commit module=uow status=start new={} dirty={} deleted={}",
            self.new_objects.len(),
            self.dirty_objects.len(),
            self.deleted_objects.len()
        );

        let batches = [
            (WriteOp::Insert, self.new_objects.take()),
            (WriteOp::Update, self.dirty_objects.take()),
            (WriteOp::Delete, self.deleted_objects.take()),
        ];

        let mut summary = CommitSummary::default();
        let mut failures = Vec::new();
        for (op, entries) in batches {
            for entry in entries {
                match flush_one(&registry, op, &entry.object) {
                    Ok(()) => summary.record(op),
                    Err(error) => {
                        let type_tag = entry.object.borrow().type_tag();
                        warn!(
                            "event=uow_flush module=uow status=error op={op} type={type_tag} key={} error={error}",
                            entry.key
                        );
                        failures.push(CommitFailure {
                            key: entry.key,
                            type_tag,
                            op,
                            error,
                        });
                    }
                }
            }
        }

        let duration_ms = started_at.elapsed().as_millis();
        if failures.is_empty() {
            info!(
                "event=uow_commit module=uow status=ok inserted={} updated={} deleted={} duration_ms={duration_ms}",
                summary.inserted, summary.updated, summary.deleted
            );
            return Ok(summary);
        }

        error!(
            "event=uow_commit module=uow status=error failures={} succeeded={} duration_ms={duration_ms}",
            failures.len(),
            summary.total()
        );
        Err(CommitError { summary, failures }.into())
    }

    fn stage(&mut self, target: StagedAs, object: SharedObject) {
        let (key, id, type_tag) = {
            let current = object.borrow();
            (current.object_key(), current.id(), current.type_tag())
        };

        if target != StagedAs::New && id.is_none() {
            warn!(
                "event=uow_stage module=uow status=warn reason=missing_id target={target:?} type={type_tag} key={key}"
            );
        }

        for state in [StagedAs::New, StagedAs::Dirty, StagedAs::Deleted] {
            if state != target {
                self.staging_set_mut(state).remove(key);
            }
        }
        self.staging_set_mut(target).insert(key, object);

        debug!("event=uow_stage module=uow status=ok target={target:?} type={type_tag} key={key}");
    }

    fn staging_set(&self, state: StagedAs) -> &StagingSet {
        match state {
            StagedAs::New => &self.new_objects,
            StagedAs::Dirty => &self.dirty_objects,
            StagedAs::Deleted => &self.deleted_objects,
        }
    }

    fn staging_set_mut(&mut self, state: StagedAs) -> &mut StagingSet {
        match state {
            StagedAs::New => &mut self.new_objects,
            StagedAs::Dirty => &mut self.dirty_objects,
            StagedAs::Deleted => &mut self.deleted_objects,
        }
    }
}

fn flush_one(
    registry: &MapperRegistry<'_>,
    op: WriteOp,
    object: &SharedObject,
) -> MapperResult<()> {
    let generated_id = {
        let current = object.borrow();
        let mapper = registry.get_mapper(&*current)?;
        match op {
            WriteOp::Insert => Some(mapper.insert_object(&*current)?),
            WriteOp::Update => {
                mapper.update_object(&*current)?;
                None
            }
            WriteOp::Delete => {
                mapper.delete_object(&*current)?;
                None
            }
        }
    };

    if let Some(id) = generated_id {
        object.borrow_mut().set_id(id);
    }
    Ok(())
}

/// Slot holding the active scope of one logical session.
///
/// Passed by reference through the call chain instead of living in a
/// process-wide global.
#[derive(Debug, Default)]
pub struct UowContext<'conn> {
    active: Option<UnitOfWork<'conn>>,
}

impl<'conn> UowContext<'conn> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active scope with an empty one and returns it.
    ///
    /// Anything still staged in the previous scope is dropped, registry
    /// binding included.
    pub fn start_new_scope(&mut self) -> &mut UnitOfWork<'conn> {
        if let Some(previous) = self.active.as_ref().filter(|scope| !scope.is_empty()) {
            warn!(
                "event=uow_scope module=uow status=warn reason=discarded_staging staged={}",
                previous.staged_len()
            );
        }
        self.active.insert(UnitOfWork::new())
    }

    /// Returns the active scope.
    pub fn current_scope(&mut self) -> UowResult<&mut UnitOfWork<'conn>> {
        self.active.as_mut().ok_or(UowError::NoActiveScope)
    }

    pub fn has_active_scope(&self) -> bool {
        self.active.is_some()
    }

    /// Detaches and returns the active scope, leaving none.
    pub fn end_scope(&mut self) -> Option<UnitOfWork<'conn>> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::{CommitSummary, UnitOfWork, UowContext, UowError};
    use crate::model::person::PersonOfInterest;

    #[test]
    fn current_scope_requires_start() {
        let mut ctx = UowContext::new();
        assert!(matches!(ctx.current_scope(), Err(UowError::NoActiveScope)));

        ctx.start_new_scope();
        assert!(ctx.current_scope().is_ok());
        assert!(ctx.end_scope().is_some());
        assert!(!ctx.has_active_scope());
    }

    #[test]
    fn commit_without_registry_keeps_staging() {
        let mut uow = UnitOfWork::new();
        uow.register_new(PersonOfInterest::new("Ada").into_shared());

        assert!(matches!(uow.commit(), Err(UowError::NoMapperRegistry)));
        assert_eq!(uow.new_objects().len(), 1);
    }

    #[test]
    fn empty_commit_needs_no_registry() {
        let mut uow = UnitOfWork::new();
        assert_eq!(uow.commit().unwrap(), CommitSummary::default());
    }

    #[test]
    fn restarting_scope_discards_staging() {
        let mut ctx = UowContext::new();
        ctx.start_new_scope()
            .register_new(PersonOfInterest::new("Ada").into_shared());

        let fresh = ctx.start_new_scope();

        assert!(fresh.is_empty());
        assert!(fresh.mapper_registry().is_none());
    }
}
