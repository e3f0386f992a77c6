//! Identity-keyed staging set.

use crate::model::domain_object::{ObjectKey, SharedObject};

/// Which staging set currently holds an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagedAs {
    New,
    Dirty,
    Deleted,
}

/// One staged object with its key captured at registration time.
#[derive(Clone)]
pub struct StagedObject {
    pub key: ObjectKey,
    pub object: SharedObject,
}

/// Insertion-ordered set of shared objects keyed by [`ObjectKey`].
#[derive(Clone, Default)]
pub struct StagingSet {
    entries: Vec<StagedObject>,
}

impl StagingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Keys in registration order.
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.entries.iter().map(|entry| entry.key).collect()
    }

    /// Adds `object`; returns `false` when the key is already present.
    pub(crate) fn insert(&mut self, key: ObjectKey, object: SharedObject) -> bool {
        if self.contains(key) {
            return false;
        }
        self.entries.push(StagedObject { key, object });
        true
    }

    pub(crate) fn remove(&mut self, key: ObjectKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != key);
        self.entries.len() != before
    }

    /// Empties the set, returning entries in registration order.
    pub(crate) fn take(&mut self) -> Vec<StagedObject> {
        std::mem::take(&mut self.entries)
    }
}

impl std::fmt::Debug for StagingSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
