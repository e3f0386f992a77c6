//! Synchronous subject/observer mixin.
//!
//! # Responsibility
//! - Keep an ordered observer list per subject.
//! - Deliver change notifications in attachment order.
//!
//! # Invariants
//! - Notification is synchronous: `notify` returns only after every observer
//!   ran or one of them failed.
//! - The first failing observer aborts the rest of that notification round;
//!   its error is returned unchanged.

mod notifier;

pub use notifier::{EmailNotifier, SmsNotifier};

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type NotifyResult<T> = Result<T, NotifyError>;

/// Failure reported by one observer's `update` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError {
    pub observer: String,
    pub message: String,
}

impl NotifyError {
    pub fn new(observer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            observer: observer.into(),
            message: message.into(),
        }
    }
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer `{}` failed: {}", self.observer, self.message)
    }
}

impl Error for NotifyError {}

/// Receiver of change notifications from subjects of type `S`.
pub trait Observer<S: ?Sized> {
    fn update(&self, subject: &S) -> NotifyResult<()>;
}

/// Ordered observer list.
///
/// Cloning yields an independent list holding the same observer handles.
pub struct ObserverList<S: ?Sized> {
    observers: Vec<Rc<dyn Observer<S>>>,
}

impl<S: ?Sized> ObserverList<S> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn attach(&mut self, observer: Rc<dyn Observer<S>>) {
        self.observers.push(observer);
    }

    /// Removes the first occurrence of `observer`.
    ///
    /// Returns `false` when it was not attached.
    pub fn detach(&mut self, observer: &Rc<dyn Observer<S>>) -> bool {
        let Some(index) = self
            .observers
            .iter()
            .position(|attached| same_observer(attached, observer))
        else {
            return false;
        };
        self.observers.remove(index);
        true
    }

    pub fn contains(&self, observer: &Rc<dyn Observer<S>>) -> bool {
        self.observers
            .iter()
            .any(|attached| same_observer(attached, observer))
    }

    pub fn notify(&self, subject: &S) -> NotifyResult<()> {
        for observer in &self.observers {
            observer.update(subject)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<S: ?Sized> Default for ObserverList<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> Clone for ObserverList<S> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

// Identity is the data pointer; vtable addresses are not unique.
fn same_observer<S: ?Sized>(a: &Rc<dyn Observer<S>>, b: &Rc<dyn Observer<S>>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// Mixin for types that expose an observer list.
pub trait Subject: Sized {
    fn observers(&self) -> &ObserverList<Self>;

    fn observers_mut(&mut self) -> &mut ObserverList<Self>;

    fn attach(&mut self, observer: Rc<dyn Observer<Self>>) {
        self.observers_mut().attach(observer);
    }

    fn detach(&mut self, observer: &Rc<dyn Observer<Self>>) -> bool {
        self.observers_mut().detach(observer)
    }

    fn notify(&self) -> NotifyResult<()> {
        self.observers().notify(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{NotifyError, NotifyResult, Observer, ObserverList};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        calls: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Observer<str> for Recorder {
        fn update(&self, subject: &str) -> NotifyResult<()> {
            self.calls
                .borrow_mut()
                .push(format!("{}:{subject}", self.label));
            if self.fail {
                return Err(NotifyError::new(self.label, "boom"));
            }
            Ok(())
        }
    }

    fn recorder(
        label: &'static str,
        calls: &Rc<RefCell<Vec<String>>>,
        fail: bool,
    ) -> Rc<dyn Observer<str>> {
        Rc::new(Recorder {
            label,
            calls: Rc::clone(calls),
            fail,
        })
    }

    #[test]
    fn notify_runs_in_attachment_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::<str>::new();
        list.attach(recorder("a", &calls, false));
        list.attach(recorder("b", &calls, false));

        list.notify("poster").unwrap();

        assert_eq!(*calls.borrow(), vec!["a:poster", "b:poster"]);
    }

    #[test]
    fn failing_observer_stops_later_ones() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::<str>::new();
        list.attach(recorder("a", &calls, true));
        list.attach(recorder("b", &calls, false));

        let err = list.notify("poster").unwrap_err();

        assert_eq!(err.observer, "a");
        assert_eq!(*calls.borrow(), vec!["a:poster"]);
    }

    #[test]
    fn detach_absent_observer_is_noop() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let attached = recorder("a", &calls, false);
        let stranger = recorder("b", &calls, false);
        let mut list = ObserverList::<str>::new();
        list.attach(Rc::clone(&attached));

        assert!(!list.detach(&stranger));
        assert_eq!(list.len(), 1);
        assert!(list.detach(&attached));
        assert!(list.is_empty());
        assert!(!list.detach(&attached));
    }
}
