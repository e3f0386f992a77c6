//! Catalog use-case service.
//!
//! # Responsibility
//! - Own the in-memory catalog (categories, posters, persons).
//! - Hold the session's unit of work scope and mapper registry.
//!
//! # Invariants
//! - The scope is started and bound to the registry at construction.
//! - Person writes are committed before the use case returns.

use crate::logging::NamedLogger;
use crate::mapper::{Mapper, MapperError, MapperRegistry, RecordMapper};
use crate::model::category::{CategoryError, CategoryId, CategoryTree, SharedCategory};
use crate::model::domain_object::{DomainObject, RecordId};
use crate::model::person::{PersonOfInterest, SharedPerson, PERSON_OF_INTEREST_TAG};
use crate::model::poster::{Poster, PosterKind, PosterSnapshot, SharedPoster};
use crate::observer::{
    EmailNotifier, NotifyError, Observer, ObserverList, SmsNotifier, Subject,
};
use crate::uow::{CommitSummary, EntityState, UowContext, UowError};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Category(CategoryError),
    Mapper(MapperError),
    Uow(UowError),
    Notify(NotifyError),
    PosterNotFound(String),
    PersonNotFound(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category(err) => write!(f, "{err}"),
            Self::Mapper(err) => write!(f, "{err}"),
            Self::Uow(err) => write!(f, "{err}"),
            Self::Notify(err) => write!(f, "{err}"),
            Self::PosterNotFound(name) => write!(f, "poster not found: {name}"),
            Self::PersonNotFound(name) => write!(f, "person of interest not found: {name}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Category(err) => Some(err),
            Self::Mapper(err) => Some(err),
            Self::Uow(err) => Some(err),
            Self::Notify(err) => Some(err),
            Self::PosterNotFound(_) | Self::PersonNotFound(_) => None,
        }
    }
}

impl From<CategoryError> for ServiceError {
    fn from(value: CategoryError) -> Self {
        Self::Category(value)
    }
}

impl From<MapperError> for ServiceError {
    fn from(value: MapperError) -> Self {
        Self::Mapper(value)
    }
}

impl From<UowError> for ServiceError {
    fn from(value: UowError) -> Self {
        Self::Uow(value)
    }
}

impl From<NotifyError> for ServiceError {
    fn from(value: NotifyError) -> Self {
        Self::Notify(value)
    }
}

/// Showbill catalog service for one session.
pub struct ShowbillService<'conn> {
    registry: MapperRegistry<'conn>,
    uow: UowContext<'conn>,
    categories: CategoryTree,
    posters: Vec<SharedPoster>,
    persons: Vec<SharedPerson>,
    poster_observers: ObserverList<Poster>,
    logger: Rc<NamedLogger>,
}

impl<'conn> ShowbillService<'conn> {
    /// Creates a service over a migrated connection.
    ///
    /// New posters get the email and sms notifiers attached.
    pub fn try_new(conn: &'conn Connection) -> ServiceResult<Self> {
        let registry = MapperRegistry::try_new(conn)?;
        let mut uow = UowContext::new();
        uow.start_new_scope().set_mapper_registry(registry);

        let mut poster_observers = ObserverList::new();
        poster_observers.attach(Rc::new(EmailNotifier));
        poster_observers.attach(Rc::new(SmsNotifier));

        Ok(Self {
            registry,
            uow,
            categories: CategoryTree::new(),
            posters: Vec::new(),
            persons: Vec::new(),
            poster_observers,
            logger: Rc::new(NamedLogger::new("main")),
        })
    }

    /// Replaces the `main` logger with one from the caller's registry.
    pub fn with_logger(mut self, logger: Rc<NamedLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn registry(&self) -> &MapperRegistry<'conn> {
        &self.registry
    }

    pub fn uow(&mut self) -> &mut UowContext<'conn> {
        &mut self.uow
    }

    /// Commits whatever is staged in the active scope.
    pub fn commit(&mut self) -> ServiceResult<CommitSummary> {
        Ok(self.uow.current_scope()?.commit()?)
    }

    pub fn create_category(
        &mut self,
        name: &str,
        parent_id: Option<CategoryId>,
    ) -> ServiceResult<SharedCategory> {
        let parent = parent_id
            .map(|id| self.categories.find_by_id(id))
            .transpose()?;
        Ok(self.categories.create(name, parent.as_ref()))
    }

    pub fn find_category(&self, id: CategoryId) -> ServiceResult<SharedCategory> {
        Ok(self.categories.find_by_id(id)?)
    }

    pub fn categories(&self) -> &[SharedCategory] {
        self.logger.log("category list");
        self.categories.categories()
    }

    /// Posters filed directly under one category.
    pub fn category_posters(&self, id: CategoryId) -> ServiceResult<Vec<SharedPoster>> {
        self.logger.log("poster list");
        Ok(self.categories.find_by_id(id)?.posters())
    }

    /// Adds an observer attached to every poster created afterwards.
    pub fn add_poster_observer(&mut self, observer: Rc<dyn Observer<Poster>>) {
        self.poster_observers.attach(observer);
    }

    pub fn create_poster(
        &mut self,
        kind: PosterKind,
        name: &str,
        category_id: CategoryId,
    ) -> ServiceResult<SharedPoster> {
        let category = self.categories.find_by_id(category_id)?;
        let poster = Poster::create(kind, name, &category);
        *poster.borrow_mut().observers_mut() = self.poster_observers.clone();
        self.posters.push(Rc::clone(&poster));

        info!(
            "event=poster_create module=service status=ok kind={} category_id={category_id}",
            kind.as_tag()
        );
        Ok(poster)
    }

    pub fn get_poster(&self, name: &str) -> Option<SharedPoster> {
        self.posters
            .iter()
            .find(|poster| poster.borrow().name == name)
            .cloned()
    }

    pub fn posters(&self) -> &[SharedPoster] {
        &self.posters
    }

    /// Duplicates a poster as `copy_<name>` and tracks the duplicate.
    ///
    /// Persons on the duplicate are fresh copies outside the tracked person list.
    pub fn copy_poster(&mut self, name: &str) -> ServiceResult<SharedPoster> {
        let original = self
            .get_poster(name)
            .ok_or_else(|| ServiceError::PosterNotFound(name.to_string()))?;

        let copy = Poster::duplicate(&original);
        copy.borrow_mut().name = format!("copy_{name}");
        self.posters.push(Rc::clone(&copy));

        info!("event=poster_copy module=service status=ok");
        Ok(copy)
    }

    pub fn poster_snapshots(&self) -> Vec<PosterSnapshot> {
        self.posters
            .iter()
            .map(|poster| poster.borrow().snapshot())
            .collect()
    }

    /// Creates a person, stages it as new and commits.
    pub fn register_person(&mut self, name: &str) -> ServiceResult<SharedPerson> {
        let person = PersonOfInterest::new(name).into_shared();
        self.persons.push(Rc::clone(&person));
        person.mark_new(&mut self.uow)?;
        self.commit()?;

        info!(
            "event=person_register module=service status=ok id={}",
            person.borrow().id().unwrap_or(-1)
        );
        Ok(person)
    }

    pub fn rename_person(
        &mut self,
        person: &SharedPerson,
        name: &str,
    ) -> ServiceResult<CommitSummary> {
        person.borrow_mut().name = name.to_string();
        person.mark_dirty(&mut self.uow)?;
        self.commit()
    }

    /// Deletes a person's row and forgets the in-memory instance.
    pub fn remove_person(&mut self, person: &SharedPerson) -> ServiceResult<CommitSummary> {
        person.mark_deleted(&mut self.uow)?;
        let summary = self.commit()?;
        self.persons.retain(|tracked| !Rc::ptr_eq(tracked, person));
        Ok(summary)
    }

    pub fn get_person(&self, name: &str) -> Option<SharedPerson> {
        self.persons
            .iter()
            .find(|person| person.borrow().name == name)
            .cloned()
    }

    pub fn persons(&self) -> &[SharedPerson] {
        &self.persons
    }

    /// Persisted persons, read fresh from the store.
    pub fn list_persons(&self) -> ServiceResult<Vec<PersonOfInterest>> {
        let Mapper::PersonOfInterest(mapper) =
            self.registry.get_mapper_for_type(PERSON_OF_INTEREST_TAG)?;
        Ok(mapper.all()?)
    }

    pub fn find_persisted_person(&self, id: RecordId) -> ServiceResult<PersonOfInterest> {
        Ok(self.registry.person_mapper().find_by_key(id)?)
    }

    /// Attaches a tracked person to a tracked poster, notifying its observers.
    pub fn add_person_to_poster(
        &mut self,
        poster_name: &str,
        person_name: &str,
    ) -> ServiceResult<()> {
        let poster = self
            .get_poster(poster_name)
            .ok_or_else(|| ServiceError::PosterNotFound(poster_name.to_string()))?;
        let person = self
            .get_person(person_name)
            .ok_or_else(|| ServiceError::PersonNotFound(person_name.to_string()))?;

        Poster::add_person(&poster, &person)?;
        Ok(())
    }
}
