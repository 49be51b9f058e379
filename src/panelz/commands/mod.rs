//! # Command Layer
//!
//! Business logic, one module per area. Commands take a [`Db`](crate::store::Db)
//! (and, where relevant, a session or paths), do their work through the stores,
//! and return a [`CmdResult`]. They never print and never check roles; the API
//! facade does the gating.
//!
//! Flows that touch more than one store (scheduling, cascading deletes) run as
//! sequential, independent writes. A later step failing does not roll back an
//! earlier one.

use crate::config::PanelzConfig;
use crate::error::Result;
use crate::model::{Candidate, Feedback, Interview, Interviewer, User};
use crate::store::StorageBackend;
use std::path::PathBuf;

pub mod auth;
pub mod candidates;
pub mod config;
pub mod dashboard;
pub mod doctor;
pub mod export;
pub mod feedback;
pub mod import;
pub mod interviewers;
pub mod interviews;

pub use dashboard::{DashboardQuery, DashboardStats};
pub use doctor::DoctorReport;

#[derive(Debug, Clone)]
pub struct PanelzPaths {
    /// Where collections, the session profile and config.json live.
    pub data: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub candidates: Vec<Candidate>,
    pub interviewers: Vec<Interviewer>,
    pub interviews: Vec<Interview>,
    pub feedback: Vec<Feedback>,
    pub user: Option<User>,
    pub stats: Option<DashboardStats>,
    pub report: Option<DoctorReport>,
    pub config: Option<PanelzConfig>,
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_interviewers(mut self, interviewers: Vec<Interviewer>) -> Self {
        self.interviewers = interviewers;
        self
    }

    pub fn with_interviews(mut self, interviews: Vec<Interview>) -> Self {
        self.interviews = interviews;
        self
    }

    pub fn with_feedback(mut self, feedback: Vec<Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.user = user;
        self
    }

    pub fn with_config(mut self, config: PanelzConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}

/// Looks a candidate up or fails with `NotFound`.
pub(crate) fn existing_candidate<B: StorageBackend>(
    db: &crate::store::Db<B>,
    id: &str,
) -> Result<Candidate> {
    db.candidates()
        .get(id)
        .ok_or_else(|| crate::error::PanelzError::not_found("candidate", id))
}
