use super::StorageBackend;
use crate::error::{PanelzError, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since panelz is single-threaded,
/// which lets `StorageBackend` take `&self` everywhere.
#[derive(Default)]
pub struct MemBackend {
    entries: RefCell<BTreeMap<String, String>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write and remove fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make every read fail.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Store raw content under `key`, bypassing serialization. Used to plant
    /// corrupt or legacy-shaped data.
    pub fn put_raw(&self, key: &str, content: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), content.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemBackend {
    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(PanelzError::Store("Simulated read error".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write_raw(&self, key: &str, content: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(PanelzError::Store("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), content.to_string());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(PanelzError::Store("Simulated write error".to_string()));
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }

    fn location(&self, key: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}.json", key))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{NewCandidate, NewInterview, NewInterviewer, Role, Status};
    use crate::store::Db;

    pub struct DbFixture {
        pub db: Db<MemBackend>,
    }

    impl Default for DbFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DbFixture {
        pub fn new() -> Self {
            Self {
                db: Db::new(MemBackend::new()),
            }
        }

        pub fn with_candidates(self, count: usize) -> Self {
            for i in 0..count {
                self.db
                    .candidates()
                    .create(NewCandidate {
                        first_name: format!("First{}", i + 1),
                        last_name: format!("Last{}", i + 1),
                        email: Some(format!("candidate{}@example.com", i + 1)),
                        department: Some("Engineering".to_string()),
                        designation: Some("Backend Developer".to_string()),
                        status: None,
                    })
                    .unwrap();
            }
            self
        }

        pub fn with_interviewer(self, name: &str, role: Role) -> Self {
            self.db
                .interviewers()
                .create(NewInterviewer {
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    role,
                })
                .unwrap();
            self
        }

        /// Schedules an interview for the n-th candidate (0-based) with the
        /// first interviewer.
        pub fn with_interview(self, candidate: usize, date: &str, status: Status) -> Self {
            let candidate_id = self.db.candidates().list()[candidate].id.clone();
            let interviewer_id = self.db.interviewers().list()[0].id.clone();
            self.db
                .interviews()
                .create(NewInterview {
                    candidate_id,
                    interviewer_id,
                    date: date.to_string(),
                    status,
                    notes: None,
                })
                .unwrap();
            self
        }
    }
}
