//! # Session
//!
//! The session is an explicit context object, built once by the client and
//! handed to whatever needs to know who is logged in:
//!
//! ```text
//! Session::init(storage)   load the persisted profile, if any
//!     └── login(user)      replace the profile and persist it
//!     └── logout()         forget the profile and remove it from storage
//! ```
//!
//! There is no expiry and no token validation. The role on the profile is the
//! one chosen at login; it is trusted as-is because everything is local.

use crate::model::User;
use crate::store::{keys, Storage, StorageBackend};
use std::rc::Rc;
use tracing::info;

pub struct Session<B: StorageBackend> {
    storage: Rc<Storage<B>>,
    user: Option<User>,
}

impl<B: StorageBackend> Session<B> {
    /// Load the session from storage. A missing or unreadable profile means
    /// nobody is logged in.
    pub fn init(storage: Rc<Storage<B>>) -> Self {
        let user: Option<User> = storage.read(keys::USER, None);
        Self { storage, user }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, user: User) {
        info!(username = %user.username, role = %user.role, "logged in");
        self.storage.write(keys::USER, &user);
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "logged out");
        }
        self.storage.remove(keys::USER);
    }
}
