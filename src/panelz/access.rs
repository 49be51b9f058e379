//! Role-based gating of views and actions.

use crate::error::{PanelzError, Result};
use crate::model::{Role, User};
use crate::session::Session;
use crate::store::StorageBackend;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    CandidateList,
    CandidateDetail,
    /// Create, edit and delete candidates.
    ManageCandidates,
    ScheduleInterviews,
    AddInterviewer,
    SubmitFeedback,
    /// Change interviewer roles, remove interviewers.
    RoleManagement,
    /// Doctor, export and import.
    Maintenance,
}

impl View {
    pub fn allowed_roles(&self) -> &'static [Role] {
        use Role::*;
        match self {
            View::Dashboard | View::CandidateList | View::CandidateDetail => {
                &[Admin, TaMember, Panelist]
            }
            View::ManageCandidates | View::ScheduleInterviews | View::AddInterviewer => {
                &[Admin, TaMember]
            }
            View::SubmitFeedback => &[Panelist],
            View::RoleManagement | View::Maintenance => &[Admin],
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Dashboard => "the dashboard",
            View::CandidateList => "the candidate list",
            View::CandidateDetail => "candidate details",
            View::ManageCandidates => "candidate management",
            View::ScheduleInterviews => "interview scheduling",
            View::AddInterviewer => "adding interviewers",
            View::SubmitFeedback => "feedback submission",
            View::RoleManagement => "role management",
            View::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The current user, if they may reach `view`.
pub fn require<B: StorageBackend>(session: &Session<B>, view: View) -> Result<&User> {
    let user = session.current_user().ok_or(PanelzError::NotLoggedIn)?;
    if !view.allows(user.role) {
        return Err(PanelzError::Forbidden {
            role: user.role,
            view: view.to_string(),
        });
    }
    Ok(user)
}
