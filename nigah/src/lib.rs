#![cfg_attr(docsrs, feature(doc_cfg))]
//! # Nigah
//!
//! An event watcher for tests.
//!
//! Nigah wraps an event source, records every event emitted through it and
//! lets a test assert how many times, and with what arguments, each event
//! occurred. Listeners already attached to the source keep receiving
//! exactly what they would without the watcher.
//!
//! ## Quick Start
//!
//! ```rust
//! use nigah::{Emitter, Watcher, args};
//!
//! let emitter = Emitter::new();
//! let watcher = Watcher::new(emitter.clone())?;
//!
//! emitter.emit("some event", &args![0, 0, 0]);
//! emitter.emit("some event", &args![1, 2, 3]);
//! emitter.emit("another event", &args![4, 5, 6]);
//!
//! assert_eq!(watcher.get_history("another event"), Some(vec![args![4, 5, 6]]));
//!
//! // non-strict: unlisted events are tolerated, zero expectations need no history
//! watcher.assert_count([("some event", 2), ("non existent event", 0)], false)?;
//!
//! // strict: every occurred event must be listed
//! assert!(watcher.assert_count([("some event", 2)], true).is_err());
//!
//! watcher.restore();
//! # Ok::<(), nigah::Error>(())
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Watcher`] | Wraps a source, records emissions, asserts counts, re-emits |
//! | [`EventSource`] | Seam a watcher wraps: a swappable emission entry point |
//! | [`Emitter`] | Single-threaded event emitter implementing [`EventSource`] |
//! | [`History`] | Per-event ordered record of argument lists |
//! | [`ExpectedCounts`] | Expected occurrence counts for [`Watcher::assert_count`] |
//! | [`WatcherConfig`] | Wildcard matching and segment delimiter |
//! | [`Occurrence`] | One emission as seen by a listener |
//!
//! ## Listening on the watcher
//!
//! A watcher is itself an event source. Listeners attached with
//! [`Watcher::on`] see every intercepted event after the source's own
//! listeners, and may use hierarchical patterns:
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//! use nigah::{Emitter, Watcher};
//!
//! let emitter = Emitter::new();
//! let watcher = Watcher::new(emitter.clone())?;
//! let names = Rc::new(RefCell::new(Vec::new()));
//! let n = names.clone();
//! watcher.on("job.*", move |e| n.borrow_mut().push(e.name().to_string()));
//!
//! watcher.emit("job.done", &[]); // goes through the emitter, and is recorded
//! emitter.emit("user.created", &[]);
//!
//! assert_eq!(*names.borrow(), vec!["job.done"]);
//! watcher.assert_count([("job.done", 1), ("user.created", 1)], true)?;
//! # Ok::<(), nigah::Error>(())
//! ```
//!
//! ## Features
//!
//! - **`serde`** - `Serialize`/`Deserialize` for [`WatcherConfig`] and `Serialize` for [`History`]
//!
//! # Note
//!
//! Emitters and watchers use `Rc` internally and are `!Send`. They are
//! designed for single-threaded, synchronous test code.

mod assertion;
mod bus;
mod capability;
mod config;
mod emitter;
mod error;
mod expected;
mod history;
mod interceptor;
mod listener_id;
mod occurrence;
mod pattern;
mod source;
mod watcher;

mod internal;

pub use assertion::assert_count;
pub use bus::EventBus;
pub use capability::{Capabilities, Capability};
pub use config::{DEFAULT_DELIMITER, WatcherConfig};
pub use emitter::Emitter;
pub use error::Error;
pub use expected::ExpectedCounts;
pub use history::History;
pub use listener_id::ListenerId;
pub use occurrence::{Args, Occurrence};
pub use pattern::EventPattern;
pub use source::{EmitFn, EventSource, same_entry};
pub use watcher::Watcher;

/// Re-exported so callers can build arguments without a direct dependency.
pub use serde_json::Value;

/// Convenience alias for `Result<T, nigah::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
