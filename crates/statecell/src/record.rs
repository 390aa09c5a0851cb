#![forbid(unsafe_code)]

//! Observable key/value record with ordered change notification.
//!
//! # Design
//!
//! [`ObservableRecord`] wraps a [`State`] and a subscriber list in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). Every [`change`] runs the
//! caller's mutator and then notifies subscribers in registration order.
//! Unlike a value observable there is no equality check: every `change`
//! notifies.
//!
//! # Invariants
//!
//! 1. The subscriber list is a private field; [`State`] enumeration never
//!    sees it.
//! 2. `version` increments by exactly 1 per mutator run.
//! 3. Subscribers are notified in registration order, each at most once per
//!    pass in [`NotifyMode::Snapshot`].
//! 4. No `RefCell` borrow is held while a subscriber runs.
//!
//! # Failure Modes
//!
//! - **Failing subscriber**: the pass stops and `change` returns
//!   [`ChangeError::Subscriber`]. The mutation is not rolled back.
//! - **Re-entrant change from a mutator**: panics (RefCell borrow rules).
//!   Calling `change` from a *subscriber* is allowed and runs a nested pass.
//! - **Panicking subscriber**: unwinds out of `change`; the record stays
//!   usable because nothing is borrowed at that point.
//!
//! [`change`]: ObservableRecord::change

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::config::{NotifyMode, RecordConfig};
use crate::error::ChangeError;
use crate::state::State;
use crate::subscriber::Subscriber;

/// Shared interior for [`ObservableRecord`].
struct RecordInner {
    state: State,
    version: u64,
    subscribers: Vec<Subscriber>,
    config: RecordConfig,
}

/// A shared key/value record that notifies subscribers on every change.
///
/// Obtain one through [`create`](crate::create) or
/// [`create_with_config`](crate::create_with_config). Cloning the handle
/// yields another view of the **same** record: state, version and
/// subscribers are shared.
pub struct ObservableRecord {
    inner: Rc<RefCell<RecordInner>>,
}

impl Clone for ObservableRecord {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for ObservableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableRecord")
            .field("state", &inner.state)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl ObservableRecord {
    pub(crate) fn from_initial(initial: Option<Value>, config: RecordConfig) -> Self {
        let state = match initial {
            None => State::new(),
            Some(Value::Object(entries)) => State::from_map(entries),
            // Arrays are keyed by index, as "0", "1", ...
            Some(Value::Array(items)) => State::from_map(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| (idx.to_string(), item))
                    .collect(),
            ),
            Some(other) => {
                tracing::warn!(
                    target: "statecell",
                    kind = value_kind(&other),
                    "should either not have arguments or an object with initial state; ignoring argument"
                );
                State::new()
            }
        };
        Self {
            inner: Rc::new(RefCell::new(RecordInner {
                state,
                version: 0,
                subscribers: Vec::new(),
                config,
            })),
        }
    }

    /// Append a subscriber. Duplicates are allowed and are notified once
    /// per registration.
    pub fn subscribe(&self, subscriber: &Subscriber) {
        self.inner.borrow_mut().subscribers.push(subscriber.clone());
    }

    /// Remove the first registration of `subscriber`, compared by identity.
    ///
    /// Returns `false` (and warns, unless disabled in [`RecordConfig`]) when
    /// the subscriber is not registered.
    pub fn unsubscribe(&self, subscriber: &Subscriber) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner
            .subscribers
            .iter()
            .position(|s| Subscriber::same(s, subscriber))
        {
            Some(idx) => {
                inner.subscribers.remove(idx);
                true
            }
            None => {
                if inner.config.warn_on_unsubscribe_miss {
                    tracing::warn!(
                        target: "statecell",
                        subscribers = inner.subscribers.len(),
                        "not subscribed to this record; check that the same subscriber handle is passed"
                    );
                }
                false
            }
        }
    }

    /// Apply `mutator` to the state, then notify every subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Subscriber`] for the first subscriber that
    /// fails; later subscribers are skipped for this pass.
    ///
    /// # Panics
    ///
    /// Panics if called from within a mutator of the same record.
    pub fn change(&self, mutator: impl FnOnce(&mut State)) -> Result<(), ChangeError> {
        let (version, mode) = {
            let mut inner = self.inner.borrow_mut();
            mutator(&mut inner.state);
            inner.version += 1;
            (inner.version, inner.config.notify_mode)
        };

        match mode {
            NotifyMode::Snapshot => self.notify_snapshot(version),
            NotifyMode::Live => self.notify_live(version),
        }
    }

    fn notify_snapshot(&self, version: u64) -> Result<(), ChangeError> {
        // Collect first so subscribers can touch the record freely.
        let subscribers: Vec<Subscriber> = self.inner.borrow().subscribers.clone();
        tracing::trace!(
            target: "statecell",
            version,
            subscribers = subscribers.len(),
            mode = "snapshot",
            "notification pass"
        );
        for (position, subscriber) in subscribers.iter().enumerate() {
            subscriber
                .notify(self)
                .map_err(|source| ChangeError::Subscriber { position, source })?;
        }
        Ok(())
    }

    fn notify_live(&self, version: u64) -> Result<(), ChangeError> {
        tracing::trace!(
            target: "statecell",
            version,
            subscribers = self.subscriber_count(),
            mode = "live",
            "notification pass"
        );
        let mut position = 0;
        loop {
            let next = self.inner.borrow().subscribers.get(position).cloned();
            let Some(subscriber) = next else {
                return Ok(());
            };
            subscriber
                .notify(self)
                .map_err(|source| ChangeError::Subscriber { position, source })?;
            position += 1;
        }
    }

    /// Clone of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().state.get(key).cloned()
    }

    /// Read the state by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if called from within a mutator of the same record.
    pub fn with<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Shallow copy of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.inner.borrow().state.to_map()
    }

    /// Number of completed mutator runs.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registrations, counting duplicates.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// The configuration this record was created with.
    #[must_use]
    pub fn config(&self) -> RecordConfig {
        self.inner.borrow().config.clone()
    }

    /// True when both handles refer to the same record.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
