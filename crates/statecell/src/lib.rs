#![forbid(unsafe_code)]

//! Observable key/value state for single-threaded programs.
//!
//! - [`create`]: build an [`ObservableRecord`] from an optional JSON object.
//! - [`ObservableRecord::subscribe`] / [`ObservableRecord::unsubscribe`]:
//!   manage [`Subscriber`]s (closures or [`UpdateHandler`] objects).
//! - [`ObservableRecord::change`]: run a mutator, then notify subscribers in
//!   registration order.
//!
//! # Architecture
//!
//! A record is an `Rc<RefCell<..>>` handle, so it is `!Send`: all work
//! happens synchronously on the caller's thread. Advisory problems (a
//! scalar or `null` initializer, unsubscribing something that was never
//! subscribed) are reported through `tracing` at WARN level under the
//! `statecell` target and never fail the call.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use statecell::{Subscriber, create};
//!
//! let record = create(Some(json!({ "count": 0 })));
//! let sub = Subscriber::callback(|rec| {
//!     println!("count is now {:?}", rec.get("count"));
//! });
//! record.subscribe(&sub);
//!
//! record
//!     .change(|state| {
//!         let next = state.get("count").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
//!         state.set("count", next);
//!     })
//!     .unwrap();
//! assert_eq!(record.get("count"), Some(json!(1)));
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod state;
pub mod subscriber;

pub use config::{NotifyMode, RecordConfig};
pub use error::{ChangeError, UpdateError, UpdateResult};
pub use record::ObservableRecord;
pub use state::State;
pub use subscriber::{Subscriber, UpdateHandler};

use serde_json::Value;

/// Create a record with the default configuration.
///
/// `None` yields empty state. An object is copied entry by entry, and an
/// array is copied under its indices (`"0"`, `"1"`, ...). Any other value
/// (including `null`) is ignored with a warning and yields empty state.
#[must_use]
pub fn create(initial: Option<Value>) -> ObservableRecord {
    create_with_config(initial, RecordConfig::default())
}

/// Create a record with an explicit configuration.
#[must_use]
pub fn create_with_config(initial: Option<Value>, config: RecordConfig) -> ObservableRecord {
    ObservableRecord::from_initial(initial, config)
}
