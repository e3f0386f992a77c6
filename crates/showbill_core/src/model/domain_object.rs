//! Persistable domain object contract.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// In-memory identity of one object instance.
///
/// Staging sets key on this value rather than on the row id, because a new
/// object has no row id until its first insert.
pub type ObjectKey = Uuid;

/// Row identifier assigned by the relational store.
pub type RecordId = i64;

/// Anything the unit of work can stage and a mapper can persist.
pub trait DomainObject: Any {
    /// Stable in-memory identity, generated with the instance.
    fn object_key(&self) -> ObjectKey;

    /// Entity-type tag used for mapper lookup and diagnostics.
    fn type_tag(&self) -> &'static str;

    /// Persisted identifier; `None` until the first successful insert.
    fn id(&self) -> Option<RecordId>;

    fn set_id(&mut self, id: RecordId);

    fn as_any(&self) -> &dyn Any;
}

/// Shared, mutable handle to any domain object.
pub type SharedObject = Rc<RefCell<dyn DomainObject>>;

/// Generates a fresh object key.
pub fn new_object_key() -> ObjectKey {
    Uuid::new_v4()
}
