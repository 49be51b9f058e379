//! # Storage Layer
//!
//! Storage is split in two levels:
//!
//! - [`StorageBackend`]: raw string I/O per key. This is the "how" of storage
//!   (filesystem vs memory) and the only place that can fail with I/O errors.
//! - [`Storage`]: the typed primitive every store is built on. It turns the
//!   backend's fallible calls into the never-failing `read`/`write`/`remove`
//!   contract: failures are logged and absorbed, readers get their fallback.
//!
//! On top of that, [`collection::Collection`] is the generic entity store,
//! instantiated once per record type through [`Db`].
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one JSON document per key, `<dir>/<key>.json`,
//!   written atomically (temp file, then rename).
//! - [`mem_backend::MemBackend`]: in-memory, for tests.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── candidates.json     # JSON array of candidates
//! ├── interviews.json     # JSON array of interviews
//! ├── interviewers.json   # JSON array of interviewers
//! ├── feedback.json       # JSON array of feedback entries
//! ├── user.json           # the session profile, absent when logged out
//! └── config.json         # configuration (see config.rs)
//! ```
//!
//! ## Change notification
//!
//! Every successful `write` or `remove` publishes a [`StorageEvent`] to the
//! subscribers registered with [`Storage::subscribe`]. Failed writes publish
//! nothing, so a subscriber that re-fetches always sees what was persisted.

use crate::error::Result;
use crate::model::{Candidate, Feedback, Interview, Interviewer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

pub mod collection;
pub mod fs_backend;
pub mod mem_backend;

pub use collection::{CandidateFilter, Collection, IdSource, Record};

/// Storage keys, one per collection plus the session profile.
pub mod keys {
    pub const CANDIDATES: &str = "candidates";
    pub const INTERVIEWS: &str = "interviews";
    pub const INTERVIEWERS: &str = "interviewers";
    pub const FEEDBACK: &str = "feedback";
    pub const USER: &str = "user";

    /// The entity collections, in export order.
    pub const COLLECTIONS: [&str; 4] = [CANDIDATES, INTERVIEWERS, INTERVIEWS, FEEDBACK];
}

/// Abstract interface for raw key/value I/O.
pub trait StorageBackend {
    /// Raw content stored under `key`. `Ok(None)` when nothing is stored.
    fn read_raw(&self, key: &str) -> Result<Option<String>>;

    /// Replace the content stored under `key`.
    fn write_raw(&self, key: &str, content: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_raw(&self, key: &str) -> Result<()>;

    /// All keys currently holding a value.
    fn keys(&self) -> Result<Vec<String>>;

    /// Where `key` lives. For `FsBackend` this is the real path, for
    /// `MemBackend` a virtual one.
    fn location(&self, key: &str) -> PathBuf;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Written,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub change: Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&StorageEvent)>;

/// The storage primitive: typed, never-failing access to a backend.
pub struct Storage<B: StorageBackend> {
    backend: B,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

impl<B: StorageBackend> Storage<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(1),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read and decode `key`, falling back on a missing key, malformed content,
    /// a stored `null`, or a backend failure.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.read_raw(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                debug!(key, "nothing stored, using fallback");
                return fallback;
            }
            Err(e) => {
                warn!(key, error = %e, "error reading storage");
                return fallback;
            }
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(key, "stored value is null, using fallback");
                fallback
            }
            Err(e) => {
                warn!(key, error = %e, "error reading storage");
                fallback
            }
        }
    }

    /// Encode and persist `value`. Failures are logged and leave the stored
    /// value untouched.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let content = match serde_json::to_string_pretty(value) {
            Ok(content) => content,
            Err(e) => {
                warn!(key, error = %e, "write failed");
                return;
            }
        };

        match self.backend.write_raw(key, &content) {
            Ok(()) => {
                debug!(key, bytes = content.len(), "written");
                self.publish(key, Change::Written);
            }
            Err(e) => warn!(key, error = %e, "write failed"),
        }
    }

    pub fn remove(&self, key: &str) {
        match self.backend.remove_raw(key) {
            Ok(()) => {
                debug!(key, "removed");
                self.publish(key, Change::Removed);
            }
            Err(e) => warn!(key, error = %e, "remove failed"),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StorageEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    fn publish(&self, key: &str, change: Change) {
        // Snapshot first so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let event = StorageEvent {
            key: key.to_string(),
            change,
        };
        for listener in listeners {
            listener(&event);
        }
    }
}

/// The four entity stores over one shared storage medium.
pub struct Db<B: StorageBackend> {
    storage: Rc<Storage<B>>,
    ids: IdSource,
}

impl<B: StorageBackend> Db<B> {
    pub fn new(backend: B) -> Self {
        Self {
            storage: Rc::new(Storage::new(backend)),
            ids: IdSource::random(),
        }
    }

    pub fn with_id_source(mut self, ids: IdSource) -> Self {
        self.ids = ids;
        self
    }

    pub fn storage(&self) -> &Rc<Storage<B>> {
        &self.storage
    }

    pub fn collection<R: Record>(&self) -> Collection<'_, B, R> {
        Collection::new(&self.storage, &self.ids)
    }

    pub fn candidates(&self) -> Collection<'_, B, Candidate> {
        self.collection()
    }

    pub fn interviewers(&self) -> Collection<'_, B, Interviewer> {
        self.collection()
    }

    pub fn interviews(&self) -> Collection<'_, B, Interview> {
        self.collection()
    }

    pub fn feedback(&self) -> Collection<'_, B, Feedback> {
        self.collection()
    }
}
