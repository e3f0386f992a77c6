//! Person of interest: the secondary entity, and the only mapped type.

use crate::model::domain_object::{new_object_key, DomainObject, ObjectKey, RecordId};
use crate::model::poster::{Poster, SharedPoster};
use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Entity-type tag of [`PersonOfInterest`].
pub const PERSON_OF_INTEREST_TAG: &str = "person_of_interest";

pub type SharedPerson = Rc<RefCell<PersonOfInterest>>;

/// A visitor following one or more posters.
#[derive(Debug)]
pub struct PersonOfInterest {
    key: ObjectKey,
    id: Option<RecordId>,
    pub name: String,
    posters: Vec<Weak<RefCell<Poster>>>,
}

impl PersonOfInterest {
    /// Creates a transient person with no persisted id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: new_object_key(),
            id: None,
            name: name.into(),
            posters: Vec::new(),
        }
    }

    /// Creates an instance for an already persisted row.
    pub fn with_id(id: RecordId, name: impl Into<String>) -> Self {
        let mut person = Self::new(name);
        person.id = Some(id);
        person
    }

    /// Same row id and name under a fresh key, attached to no poster.
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            key: new_object_key(),
            id: self.id,
            name: self.name.clone(),
            posters: Vec::new(),
        }
    }

    pub fn into_shared(self) -> SharedPerson {
        Rc::new(RefCell::new(self))
    }

    /// Posters this person is attached to, in attachment order.
    ///
    /// Posters that were dropped by their owner are skipped.
    pub fn posters(&self) -> Vec<SharedPoster> {
        self.posters.iter().filter_map(Weak::upgrade).collect()
    }

    pub(crate) fn push_poster(&mut self, poster: &SharedPoster) {
        self.posters.push(Rc::downgrade(poster));
    }
}

impl DomainObject for PersonOfInterest {
    fn object_key(&self) -> ObjectKey {
        self.key
    }

    fn type_tag(&self) -> &'static str {
        PERSON_OF_INTEREST_TAG
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
