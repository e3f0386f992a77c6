//! Category tree scoping poster collections.
//!
//! # Responsibility
//! - Own every category created in a session and assign monotonic ids.
//! - Compute the recursive poster count.
//!
//! # Invariants
//! - Ids are assigned from 0 upward and never reused within one tree.
//! - A category references its parent weakly; the tree owns both.
//! - The parent chain is assumed acyclic. `create` only accepts an existing
//!   category as parent, so the tree itself cannot build a cycle.

use crate::model::poster::{Poster, SharedPoster};
use log::info;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

pub type CategoryId = u64;

pub type SharedCategory = Rc<Category>;

pub type CategoryResult<T> = Result<T, CategoryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    CategoryNotFound(CategoryId),
}

impl Display for CategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryNotFound(id) => write!(f, "category not found: id={id}"),
        }
    }
}

impl Error for CategoryError {}

/// One node of the category tree.
#[derive(Debug)]
pub struct Category {
    id: CategoryId,
    name: String,
    parent: Option<Weak<Category>>,
    posters: RefCell<Vec<Weak<RefCell<Poster>>>>,
}

impl Category {
    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent category, if any and still alive.
    pub fn parent(&self) -> Option<SharedCategory> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Posters filed directly under this category, in creation order.
    pub fn posters(&self) -> Vec<SharedPoster> {
        self.posters.borrow().iter().filter_map(Weak::upgrade).collect()
    }

    pub fn direct_poster_count(&self) -> usize {
        self.posters
            .borrow()
            .iter()
            .filter(|poster| poster.strong_count() > 0)
            .count()
    }

    /// Direct poster count plus the parent's full `poster_count`.
    ///
    /// The parent term is the parent's own recursive total, not a sum over
    /// children, so counts compound along the ancestor chain.
    pub fn poster_count(&self) -> usize {
        let inherited = self.parent().map_or(0, |parent| parent.poster_count());
        self.direct_poster_count() + inherited
    }

    pub(crate) fn push_poster(&self, poster: &SharedPoster) {
        self.posters.borrow_mut().push(Rc::downgrade(poster));
    }
}

/// Owner of all categories of one catalog.
#[derive(Debug, Default)]
pub struct CategoryTree {
    next_id: CategoryId,
    categories: Vec<SharedCategory>,
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a category under `parent` (or at the root) with the next id.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        parent: Option<&SharedCategory>,
    ) -> SharedCategory {
        let category = Rc::new(Category {
            id: self.next_id,
            name: name.into(),
            parent: parent.map(Rc::downgrade),
            posters: RefCell::new(Vec::new()),
        });
        self.next_id += 1;
        self.categories.push(Rc::clone(&category));

        info!(
            "event=category_create module=category status=ok category_id={} parent_id={}",
            category.id,
            parent.map_or_else(|| "none".to_string(), |p| p.id.to_string())
        );
        category
    }

    /// Linear lookup over every category created by this tree.
    pub fn find_by_id(&self, id: CategoryId) -> CategoryResult<SharedCategory> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
            .ok_or(CategoryError::CategoryNotFound(id))
    }

    /// All categories in creation order.
    pub fn categories(&self) -> &[SharedCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
