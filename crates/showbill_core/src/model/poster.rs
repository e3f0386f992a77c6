//! Poster aggregate.
//!
//! # Responsibility
//! - Hold the persons of interest attached to one poster.
//! - Notify observers whenever a person is attached.
//!
//! # Invariants
//! - `Poster::add_person` is the only mutation that triggers notification.
//! - A poster always belongs to exactly one category; the category is shared,
//!   never owned.
//! - Duplicates never share their person or observer lists with the original.
//! - Observers run while the poster is immutably borrowed. An observer may
//!   read a `SharedPoster` it holds, but must not borrow it mutably or call
//!   `Poster::add_person` on it; doing so panics with `BorrowMutError`.

use crate::model::category::SharedCategory;
use crate::model::domain_object::{new_object_key, ObjectKey};
use crate::model::person::SharedPerson;
use crate::observer::{NotifyResult, ObserverList, Subject};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

pub type SharedPoster = Rc<RefCell<Poster>>;

/// Poster flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterKind {
    Music,
    Films,
    Theatre,
}

impl PosterKind {
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Films => "films",
            Self::Theatre => "theatre",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "music" => Some(Self::Music),
            "films" => Some(Self::Films),
            "theatre" => Some(Self::Theatre),
            _ => None,
        }
    }
}

/// One announcement in a category.
pub struct Poster {
    key: ObjectKey,
    kind: PosterKind,
    pub name: String,
    category: SharedCategory,
    persons: Vec<SharedPerson>,
    observers: ObserverList<Poster>,
}

impl Poster {
    /// Creates a poster and files it under `category`.
    pub fn create(
        kind: PosterKind,
        name: impl Into<String>,
        category: &SharedCategory,
    ) -> SharedPoster {
        let poster = Rc::new(RefCell::new(Self {
            key: new_object_key(),
            kind,
            name: name.into(),
            category: Rc::clone(category),
            persons: Vec::new(),
            observers: ObserverList::new(),
        }));
        category.push_poster(&poster);
        poster
    }

    /// Attaches `person`, records the back-reference, then notifies observers.
    ///
    /// Both relationship lists are updated before any observer runs, so an
    /// observer failure leaves the attachment in place.
    pub fn add_person(poster: &SharedPoster, person: &SharedPerson) -> NotifyResult<()> {
        poster.borrow_mut().persons.push(Rc::clone(person));
        person.borrow_mut().push_poster(poster);

        let poster = poster.borrow();
        debug!(
            "event=poster_add_person module=poster status=ok poster={} observers={}",
            poster.name,
            poster.observers.len()
        );
        poster.notify()
    }

    /// Deep-copies `poster` under a fresh object key.
    ///
    /// Each attached person is duplicated and its back-references point only
    /// at the copy. The observer list is copied with shared handles, and the
    /// category stays shared without filing the copy.
    pub fn duplicate(poster: &SharedPoster) -> SharedPoster {
        let source = poster.borrow();
        let copy = Rc::new(RefCell::new(Self {
            key: new_object_key(),
            kind: source.kind,
            name: source.name.clone(),
            category: Rc::clone(&source.category),
            persons: Vec::new(),
            observers: source.observers.clone(),
        }));

        let persons: Vec<SharedPerson> = source
            .persons
            .iter()
            .map(|person| {
                let twin = person.borrow().detached_copy().into_shared();
                twin.borrow_mut().push_poster(&copy);
                twin
            })
            .collect();
        copy.borrow_mut().persons = persons;
        copy
    }

    pub fn key(&self) -> ObjectKey {
        self.key
    }

    pub fn kind(&self) -> PosterKind {
        self.kind
    }

    pub fn category(&self) -> &SharedCategory {
        &self.category
    }

    pub fn persons(&self) -> &[SharedPerson] {
        &self.persons
    }

    pub fn person(&self, index: usize) -> Option<&SharedPerson> {
        self.persons.get(index)
    }

    pub fn into_shared(self) -> SharedPoster {
        Rc::new(RefCell::new(self))
    }

    pub fn snapshot(&self) -> PosterSnapshot {
        PosterSnapshot {
            kind: self.kind,
            name: self.name.clone(),
            category: self.category.name().to_string(),
            persons: self
                .persons
                .iter()
                .map(|person| person.borrow().name.clone())
                .collect(),
        }
    }
}

impl Subject for Poster {
    fn observers(&self) -> &ObserverList<Self> {
        &self.observers
    }

    fn observers_mut(&mut self) -> &mut ObserverList<Self> {
        &mut self.observers
    }
}

impl Debug for Poster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poster")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("category", &self.category.id())
            .field("persons", &self.persons.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Serializable read model of a poster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterSnapshot {
    pub kind: PosterKind,
    pub name: String,
    pub category: String,
    pub persons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::{Poster, PosterKind};
    use crate::model::category::CategoryTree;

    #[test]
    fn kind_tags_roundtrip_known_values_only() {
        for kind in [PosterKind::Music, PosterKind::Films, PosterKind::Theatre] {
            assert_eq!(PosterKind::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(PosterKind::from_tag("circus"), None);
    }

    #[test]
    fn create_files_poster_under_category() {
        let mut tree = CategoryTree::new();
        let category = tree.create("Cinema", None);
        let poster = Poster::create(PosterKind::Films, "Premiere", &category);

        assert_eq!(category.direct_poster_count(), 1);
        assert_eq!(poster.borrow().category().id(), category.id());
    }

    #[test]
    fn duplicate_gets_fresh_key_and_is_not_filed() {
        let mut tree = CategoryTree::new();
        let category = tree.create("Cinema", None);
        let poster = Poster::create(PosterKind::Films, "Premiere", &category);

        let copy = Poster::duplicate(&poster);

        assert_ne!(copy.borrow().key(), poster.borrow().key());
        assert_eq!(copy.borrow().name, "Premiere");
        assert_eq!(category.direct_poster_count(), 1);
    }
}
