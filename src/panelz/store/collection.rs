//! # Entity Stores
//!
//! A [`Collection`] owns one storage key holding a JSON array of one
//! [`Record`] type. Every operation is a full read-modify-write cycle:
//! read the array, change it in memory, write the whole array back.
//!
//! Contract, uniform across all record types:
//!
//! - `list` returns the collection in insertion order.
//! - `get` is a linear scan and never fails.
//! - `create`, `update` and `delete` return the single affected record.
//! - `update` and `delete` fail with `NotFound` for unknown ids.
//! - Records are validated before they are written; any failure leaves the
//!   stored collection exactly as it was.
//!
//! Ids come from an [`IdSource`] and are checked against the ids already in
//! the collection, retrying on collision.
//!
//! Records are decoded one at a time. An entry that does not fit the record
//! type is logged and left out of every result, but it is kept in the stored
//! array so a later write does not drop it.

use super::{Storage, StorageBackend, SubscriptionId};
use crate::error::{PanelzError, Result};
use crate::model::{
    Candidate, CandidatePatch, Feedback, FeedbackPatch, Interview, InterviewPatch, Interviewer,
    InterviewerPatch, NewCandidate, NewFeedback, NewInterview, NewInterviewer, Status,
};
use crate::store::keys;
use crate::validation;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::marker::PhantomData;
use tracing::{debug, warn};
use uuid::Uuid;

/// Generation gives up after this many consecutive collisions.
pub const MAX_ID_ATTEMPTS: usize = 64;

/// One entity type stored as a collection.
pub trait Record: Clone + Serialize + DeserializeOwned + 'static {
    /// The record before an id has been assigned.
    type Draft;
    /// Partial update; present fields overwrite, absent fields are kept.
    type Patch;

    const KEY: &'static str;
    /// Human label used in errors ("candidate not found: ...").
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn from_draft(id: String, draft: Self::Draft) -> Self;
    fn merge(&mut self, patch: Self::Patch);
    fn validate(&self) -> Result<()>;
}

impl Record for Candidate {
    type Draft = NewCandidate;
    type Patch = CandidatePatch;
    const KEY: &'static str = keys::CANDIDATES;
    const KIND: &'static str = "candidate";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewCandidate) -> Self {
        Candidate {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            department: draft.department,
            designation: draft.designation,
            status: draft.status.unwrap_or_default(),
        }
    }

    fn merge(&mut self, patch: CandidatePatch) {
        self.apply(patch)
    }

    fn validate(&self) -> Result<()> {
        validation::candidate(self)
    }
}

impl Record for Interviewer {
    type Draft = NewInterviewer;
    type Patch = InterviewerPatch;
    const KEY: &'static str = keys::INTERVIEWERS;
    const KIND: &'static str = "interviewer";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewInterviewer) -> Self {
        Interviewer {
            id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
        }
    }

    fn merge(&mut self, patch: InterviewerPatch) {
        self.apply(patch)
    }

    fn validate(&self) -> Result<()> {
        validation::interviewer(self)
    }
}

impl Record for Interview {
    type Draft = NewInterview;
    type Patch = InterviewPatch;
    const KEY: &'static str = keys::INTERVIEWS;
    const KIND: &'static str = "interview";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewInterview) -> Self {
        Interview {
            id,
            candidate_id: draft.candidate_id,
            interviewer_id: draft.interviewer_id,
            date: canonical_or_given(draft.date),
            status: draft.status,
            notes: draft.notes,
        }
    }

    fn merge(&mut self, patch: InterviewPatch) {
        self.apply(patch);
        self.date = canonical_or_given(std::mem::take(&mut self.date));
    }

    fn validate(&self) -> Result<()> {
        validation::interview(self)
    }
}

impl Record for Feedback {
    type Draft = NewFeedback;
    type Patch = FeedbackPatch;
    const KEY: &'static str = keys::FEEDBACK;
    const KIND: &'static str = "feedback";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewFeedback) -> Self {
        Feedback {
            id,
            candidate_id: draft.candidate_id,
            score: draft.score,
            strengths: draft.strengths,
            improvements: draft.improvements,
            created_at: Utc::now(),
            author_role: draft.author_role,
        }
    }

    fn merge(&mut self, patch: FeedbackPatch) {
        self.apply(patch)
    }

    fn validate(&self) -> Result<()> {
        validation::feedback(self)
    }
}

/// Unparseable dates are kept as given; validation rejects them.
fn canonical_or_given(date: String) -> String {
    validation::canonical_datetime(&date).unwrap_or(date)
}

/// Source of candidate ids. Collisions with existing ids are handled by the
/// collection, so a source only has to produce ids, not unique ones.
pub struct IdSource {
    next: RefCell<Box<dyn FnMut() -> String>>,
}

impl Default for IdSource {
    fn default() -> Self {
        Self::random()
    }
}

impl IdSource {
    pub fn random() -> Self {
        Self::from_fn(|| Uuid::new_v4().simple().to_string())
    }

    pub fn from_fn<F>(next: F) -> Self
    where
        F: FnMut() -> String + 'static,
    {
        Self {
            next: RefCell::new(Box::new(next)),
        }
    }

    /// Yields `ids` in order, then random ids.
    pub fn sequence<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'static,
    {
        let mut ids = ids.into_iter();
        Self::from_fn(move || {
            ids.next()
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
        })
    }

    /// First generated id for which `taken` is false.
    pub fn fresh(&self, taken: impl Fn(&str) -> bool) -> Option<String> {
        let mut next = self.next.borrow_mut();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (*next)();
            if !taken(&id) {
                return Some(id);
            }
            debug!(id = %id, "generated id collides, retrying");
        }
        None
    }
}

/// A decoded collection plus the stored entries that did not decode.
struct Loaded<R> {
    records: Vec<R>,
    unreadable: Vec<Value>,
}

impl<R> Loaded<R> {
    fn is_taken(&self, id: &str) -> bool
    where
        R: Record,
    {
        self.records.iter().any(|r| r.id() == id)
            || self.unreadable.iter().any(|v| raw_id(v).as_deref() == Some(id))
    }
}

/// The id of an undecodable entry, string or legacy number.
fn raw_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub struct Collection<'a, B: StorageBackend, R: Record> {
    storage: &'a Storage<B>,
    ids: &'a IdSource,
    _record: PhantomData<R>,
}

impl<'a, B: StorageBackend, R: Record> Collection<'a, B, R> {
    pub fn new(storage: &'a Storage<B>, ids: &'a IdSource) -> Self {
        Self {
            storage,
            ids,
            _record: PhantomData,
        }
    }

    pub fn list(&self) -> Vec<R> {
        self.load().records
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.list().into_iter().find(|r| r.id() == id)
    }

    pub fn create(&self, draft: R::Draft) -> Result<R> {
        let mut loaded = self.load();
        let id = self
            .ids
            .fresh(|candidate| loaded.is_taken(candidate))
            .ok_or_else(|| {
                PanelzError::Store(format!(
                    "could not generate a unique {} id after {} attempts",
                    R::KIND,
                    MAX_ID_ATTEMPTS
                ))
            })?;

        let record = R::from_draft(id, draft);
        record.validate()?;
        loaded.records.push(record.clone());
        self.persist(&loaded);
        debug!(kind = R::KIND, id = record.id(), "created");
        Ok(record)
    }

    pub fn update(&self, id: &str, patch: R::Patch) -> Result<R> {
        let mut loaded = self.load();
        let pos = self.position(&loaded.records, id)?;

        let mut updated = loaded.records[pos].clone();
        updated.merge(patch);
        updated.validate()?;
        loaded.records[pos] = updated.clone();
        self.persist(&loaded);
        debug!(kind = R::KIND, id, "updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<R> {
        let mut loaded = self.load();
        let pos = self.position(&loaded.records, id)?;

        let removed = loaded.records.remove(pos);
        self.persist(&loaded);
        debug!(kind = R::KIND, id, "deleted");
        Ok(removed)
    }

    /// Remove every record matching `predicate` in a single write. Returns the
    /// removed records; nothing is written when none match.
    pub fn delete_where(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        let mut loaded = self.load();
        let (removed, kept): (Vec<R>, Vec<R>) =
            loaded.records.into_iter().partition(|r| predicate(r));
        loaded.records = kept;
        if !removed.is_empty() {
            self.persist(&loaded);
            debug!(kind = R::KIND, count = removed.len(), "deleted matching");
        }
        removed
    }

    /// Append records as they are, keeping their ids. Records whose id is
    /// already present are skipped. Returns how many were added.
    pub fn insert_many(&self, incoming: Vec<R>) -> Result<usize> {
        let mut loaded = self.load();
        let mut added = 0;
        for record in incoming {
            if loaded.is_taken(record.id()) {
                continue;
            }
            record.validate()?;
            loaded.records.push(record);
            added += 1;
        }
        if added > 0 {
            self.persist(&loaded);
        }
        Ok(added)
    }

    /// Calls `listener` after every successful write to this collection.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + 'static,
    {
        self.storage.subscribe(move |event| {
            if event.key == R::KEY {
                listener()
            }
        })
    }

    fn position(&self, records: &[R], id: &str) -> Result<usize> {
        records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| PanelzError::not_found(R::KIND, id))
    }

    fn load(&self) -> Loaded<R> {
        let entries: Vec<Value> = self.storage.read(R::KEY, Vec::new());
        let mut loaded = Loaded {
            records: Vec::with_capacity(entries.len()),
            unreadable: Vec::new(),
        };
        for entry in entries {
            match serde_json::from_value::<R>(entry.clone()) {
                Ok(record) => loaded.records.push(record),
                Err(e) => {
                    warn!(kind = R::KIND, error = %e, "skipping unreadable record");
                    loaded.unreadable.push(entry);
                }
            }
        }
        loaded
    }

    /// Unreadable entries are written back after the records.
    fn persist(&self, loaded: &Loaded<R>) {
        if loaded.unreadable.is_empty() {
            self.storage.write(R::KEY, &loaded.records);
            return;
        }
        let mut entries = Vec::with_capacity(loaded.records.len() + loaded.unreadable.len());
        for record in &loaded.records {
            match serde_json::to_value(record) {
                Ok(value) => entries.push(value),
                Err(e) => {
                    warn!(kind = R::KIND, error = %e, "write failed");
                    return;
                }
            }
        }
        entries.extend(loaded.unreadable.iter().cloned());
        self.storage.write(R::KEY, &entries);
    }
}

/// Newest first. Dates stored before they were canonicalised are compared
/// in canonical form too.
pub(crate) fn by_date_desc(interviews: &mut [Interview]) {
    interviews.sort_by_cached_key(|i| {
        std::cmp::Reverse(
            validation::canonical_datetime(&i.date).unwrap_or_else(|| i.date.clone()),
        )
    });
}

impl<B: StorageBackend> Collection<'_, B, Interview> {
    /// Interviews for a candidate, newest date first.
    pub fn list_by_candidate(&self, candidate_id: &str) -> Vec<Interview> {
        let mut found: Vec<Interview> = self
            .list()
            .into_iter()
            .filter(|i| i.candidate_id == candidate_id)
            .collect();
        by_date_desc(&mut found);
        found
    }

    /// Interviews assigned to an interviewer, newest date first.
    pub fn list_by_interviewer(&self, interviewer_id: &str) -> Vec<Interview> {
        let mut found: Vec<Interview> = self
            .list()
            .into_iter()
            .filter(|i| i.interviewer_id == interviewer_id)
            .collect();
        by_date_desc(&mut found);
        found
    }

    /// Apply `patch` to every interview of a candidate, in one write. No match
    /// is not an error: the result is empty and nothing is written.
    pub fn update_by_candidate(
        &self,
        candidate_id: &str,
        patch: &InterviewPatch,
    ) -> Result<Vec<Interview>> {
        let mut loaded = self.load();
        let mut updated = Vec::new();
        for interview in loaded.records.iter_mut() {
            if interview.candidate_id != candidate_id {
                continue;
            }
            let mut merged = interview.clone();
            merged.merge(patch.clone());
            merged.validate()?;
            *interview = merged.clone();
            updated.push(merged);
        }
        if !updated.is_empty() {
            self.persist(&loaded);
        }
        Ok(updated)
    }
}

impl<B: StorageBackend> Collection<'_, B, Feedback> {
    /// Feedback for a candidate, in the order it was recorded.
    pub fn list_by_candidate(&self, candidate_id: &str) -> Vec<Feedback> {
        self.list()
            .into_iter()
            .filter(|f| f.candidate_id == candidate_id)
            .collect()
    }
}

/// Candidate search as offered by the candidate list.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    /// Case-insensitive substring of "first last email".
    pub query: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: Option<Status>,
}

impl CandidateFilter {
    pub fn matches(&self, c: &Candidate) -> bool {
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            let haystack = format!(
                "{} {} {}",
                c.first_name,
                c.last_name,
                c.email.as_deref().unwrap_or_default()
            )
            .to_lowercase();
            if !haystack.contains(&query.to_lowercase()) {
                return false;
            }
        }
        if let Some(dept) = &self.department {
            if c.department.as_deref() != Some(dept.as_str()) {
                return false;
            }
        }
        if let Some(designation) = &self.designation {
            if c.designation.as_deref() != Some(designation.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if c.status != status {
                return false;
            }
        }
        true
    }
}

impl<B: StorageBackend> Collection<'_, B, Candidate> {
    pub fn search(&self, filter: &CandidateFilter) -> Vec<Candidate> {
        self.list()
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect()
    }
}
