#![forbid(unsafe_code)]

//! Subscribers: plain callbacks or handler objects.
//!
//! A [`Subscriber`] is a cheap, clonable handle. Clones share identity, and
//! identity is what [`ObservableRecord::unsubscribe`] matches on, so keep the
//! handle (or a clone) around if you intend to unsubscribe later.
//!
//! [`ObservableRecord::unsubscribe`]: crate::ObservableRecord::unsubscribe

use std::fmt;
use std::rc::Rc;

use crate::error::UpdateResult;
use crate::record::ObservableRecord;

type CallbackRc = Rc<dyn Fn(&ObservableRecord) -> UpdateResult>;

/// An object notified after each change to a record it is subscribed to.
pub trait UpdateHandler {
    /// Called once per notification pass with the changed record.
    fn handle_update(&self, record: &ObservableRecord) -> UpdateResult;
}

/// Something that can be subscribed to an [`ObservableRecord`].
#[derive(Clone)]
pub enum Subscriber {
    /// A closure receiving the record.
    Callback(CallbackRc),
    /// An object whose [`UpdateHandler::handle_update`] receives the record.
    Handler(Rc<dyn UpdateHandler>),
}

impl Subscriber {
    /// Wrap an infallible closure.
    pub fn callback(f: impl Fn(&ObservableRecord) + 'static) -> Self {
        Self::Callback(Rc::new(move |record: &ObservableRecord| -> UpdateResult {
            f(record);
            Ok(())
        }))
    }

    /// Wrap a closure whose error aborts the notification pass.
    pub fn try_callback(f: impl Fn(&ObservableRecord) -> UpdateResult + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }

    /// Wrap a shared handler object. Handles built from clones of the same
    /// `Rc` are the same subscriber.
    pub fn handler<H: UpdateHandler + 'static>(handler: Rc<H>) -> Self {
        Self::Handler(handler)
    }

    /// Identity comparison: true when both handles refer to the same
    /// callback or handler allocation.
    #[must_use]
    pub fn same(a: &Self, b: &Self) -> bool {
        match (a, b) {
            (Self::Callback(x), Self::Callback(y)) => addr(x) == addr(y),
            (Self::Handler(x), Self::Handler(y)) => addr(x) == addr(y),
            _ => false,
        }
    }

    pub(crate) fn notify(&self, record: &ObservableRecord) -> UpdateResult {
        match self {
            Self::Callback(f) => f(record),
            Self::Handler(h) => h.handle_update(record),
        }
    }
}

// Data address only; vtable pointers for the same type may differ across
// codegen units.
fn addr<T: ?Sized>(rc: &Rc<T>) -> *const () {
    Rc::as_ptr(rc).cast::<()>()
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Callback(_) => "Callback",
            Self::Handler(_) => "Handler",
        };
        f.debug_tuple("Subscriber").field(&kind).finish()
    }
}

impl<H: UpdateHandler + 'static> From<Rc<H>> for Subscriber {
    fn from(handler: Rc<H>) -> Self {
        Self::handler(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create;
    use std::cell::Cell;

    struct Counter {
        hits: Cell<u32>,
    }

    impl UpdateHandler for Counter {
        fn handle_update(&self, _record: &ObservableRecord) -> UpdateResult {
            self.hits.set(self.hits.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn clones_share_identity() {
        let a = Subscriber::callback(|_| {});
        let b = a.clone();
        assert!(Subscriber::same(&a, &b));
    }

    #[test]
    fn distinct_closures_differ() {
        let a = Subscriber::callback(|_| {});
        let b = Subscriber::callback(|_| {});
        assert!(!Subscriber::same(&a, &b));
    }

    #[test]
    fn handlers_from_same_rc_are_same() {
        let counter = Rc::new(Counter { hits: Cell::new(0) });
        let a = Subscriber::handler(Rc::clone(&counter));
        let b: Subscriber = Rc::clone(&counter).into();
        assert!(Subscriber::same(&a, &b));
    }

    #[test]
    fn callback_and_handler_never_same() {
        let counter = Rc::new(Counter { hits: Cell::new(0) });
        let a = Subscriber::handler(counter);
        let b = Subscriber::callback(|_| {});
        assert!(!Subscriber::same(&a, &b));
    }

    #[test]
    fn notify_dispatches_to_handler() {
        let record = create(None);
        let counter = Rc::new(Counter { hits: Cell::new(0) });
        let sub = Subscriber::handler(Rc::clone(&counter));
        sub.notify(&record).unwrap();
        sub.notify(&record).unwrap();
        assert_eq!(counter.hits.get(), 2);
    }

    #[test]
    fn try_callback_surfaces_error() {
        let record = create(None);
        let sub = Subscriber::try_callback(|_| Err("nope".into()));
        let err = sub.notify(&record).unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn debug_names_variant() {
        let sub = Subscriber::callback(|_| {});
        assert_eq!(format!("{sub:?}"), "Subscriber(\"Callback\")");
    }
}
