//! Core data types.
//!
//! Every record serializes as a camelCase JSON object; the collections on disk
//! are plain JSON arrays of these shapes. All identifiers are opaque strings.
//! Older data that stored numeric ids (or numeric references to them) is
//! normalized to the decimal string form when read, see [`id_repr`].

use crate::error::PanelzError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Scheduled => "scheduled",
            Status::Completed => "completed",
            Status::Cancelled => "cancelled",
        }
    }

    pub fn all() -> &'static [Status] {
        &[Status::Scheduled, Status::Completed, Status::Cancelled]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = PanelzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(Status::Scheduled),
            "completed" => Ok(Status::Completed),
            "cancelled" | "canceled" => Ok(Status::Cancelled),
            other => Err(PanelzError::validation(
                "status",
                format!("'{}' (expected scheduled, completed or cancelled)", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Panelist,
    TaMember,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Panelist => "panelist",
            Role::TaMember => "ta_member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PanelzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "admin" => Ok(Role::Admin),
            "panelist" => Ok(Role::Panelist),
            "ta_member" | "ta" => Ok(Role::TaMember),
            other => Err(PanelzError::validation(
                "role",
                format!("'{}' (expected admin, panelist or ta_member)", other),
            )),
        }
    }
}

// --- Candidate ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(deserialize_with = "id_repr::deserialize")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn apply(&mut self, patch: CandidatePatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = Some(v);
        }
        if let Some(v) = patch.department {
            self.department = Some(v);
        }
        if let Some(v) = patch.designation {
            self.designation = Some(v);
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }
}

/// A candidate before it has been assigned an id. `status` defaults to
/// [`Status::Scheduled`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: Option<Status>,
}

impl CandidatePatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// --- Interviewer ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interviewer {
    #[serde(deserialize_with = "id_repr::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl Interviewer {
    pub fn apply(&mut self, patch: InterviewerPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.role {
            self.role = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewInterviewer {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

// --- Interview ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    #[serde(deserialize_with = "id_repr::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "id_repr::deserialize")]
    pub candidate_id: String,
    #[serde(default, deserialize_with = "id_repr::deserialize")]
    pub interviewer_id: String,
    /// ISO-8601 local datetime, stored as `YYYY-MM-DDTHH:MM[:SS]` so lexical
    /// order is chronological order.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Interview {
    pub fn apply(&mut self, patch: InterviewPatch) {
        if let Some(v) = patch.candidate_id {
            self.candidate_id = v;
        }
        if let Some(v) = patch.interviewer_id {
            self.interviewer_id = v;
        }
        if let Some(v) = patch.date {
            self.date = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.notes {
            self.notes = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewInterview {
    pub candidate_id: String,
    pub interviewer_id: String,
    pub date: String,
    pub status: Status,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewPatch {
    pub candidate_id: Option<String>,
    pub interviewer_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<Status>,
    pub notes: Option<String>,
}

impl InterviewPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

// --- Feedback ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(deserialize_with = "id_repr::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "id_repr::deserialize")]
    pub candidate_id: String,
    pub score: u8,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub improvements: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_role: Option<Role>,
}

impl Feedback {
    /// `created_at` is not patchable.
    pub fn apply(&mut self, patch: FeedbackPatch) {
        if let Some(v) = patch.score {
            self.score = v;
        }
        if let Some(v) = patch.strengths {
            self.strengths = v;
        }
        if let Some(v) = patch.improvements {
            self.improvements = v;
        }
        if let Some(v) = patch.author_role {
            self.author_role = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFeedback {
    pub candidate_id: String,
    pub score: u8,
    pub strengths: String,
    pub improvements: String,
    pub author_role: Option<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackPatch {
    pub score: Option<u8>,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub author_role: Option<Role>,
}

// --- Session user ---

/// The logged-in user. The role is whatever the client chose at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_repr::deserialize")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub role: Role,
}

impl User {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}

/// Accepts identifiers stored either as JSON strings or JSON integers.
pub mod id_repr {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        })
    }
}
