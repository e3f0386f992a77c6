//! Entity state mixin: `mark_new` / `mark_dirty` / `mark_deleted`.

use super::unit_of_work::{UowContext, UowResult};
use crate::model::domain_object::DomainObject;
use std::cell::RefCell;
use std::rc::Rc;

/// Lets a shared domain object stage itself in the active scope.
///
/// Each call moves the object out of whichever set held it before.
///
/// # Errors
/// - `UowError::NoActiveScope` when `ctx` has no started scope.
pub trait EntityState {
    fn mark_new(&self, ctx: &mut UowContext<'_>) -> UowResult<()>;

    fn mark_dirty(&self, ctx: &mut UowContext<'_>) -> UowResult<()>;

    fn mark_deleted(&self, ctx: &mut UowContext<'_>) -> UowResult<()>;
}

impl<T: DomainObject> EntityState for Rc<RefCell<T>> {
    fn mark_new(&self, ctx: &mut UowContext<'_>) -> UowResult<()> {
        ctx.current_scope()?.register_new(self.clone());
        Ok(())
    }

    fn mark_dirty(&self, ctx: &mut UowContext<'_>) -> UowResult<()> {
        ctx.current_scope()?.register_dirty(self.clone());
        Ok(())
    }

    fn mark_deleted(&self, ctx: &mut UowContext<'_>) -> UowResult<()> {
        ctx.current_scope()?.register_deleted(self.clone());
        Ok(())
    }
}
