//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every panelz operation, whatever UI sits on top.
//!
//! The facade:
//! - **Gates** each call through [`access::require`] with the view it belongs to
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It holds no business logic and does no terminal I/O.
//!
//! ## Generic Over StorageBackend
//!
//! `PanelzApi<B: StorageBackend>`:
//! - Production: `PanelzApi<FsBackend>`
//! - Testing: `PanelzApi<MemBackend>`
//!
//! API tests check gating and dispatch; command logic is tested in the
//! command modules.

use crate::access::{self, View};
use crate::commands;
use crate::error::{PanelzError, Result};
use crate::identity::{Credentials, IdentityProvider};
use crate::model::{
    CandidatePatch, FeedbackPatch, NewCandidate, NewFeedback, NewInterviewer, Role, User,
};
use crate::session::Session;
use crate::store::{Db, StorageBackend};
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::interviews::Schedule;
pub use crate::commands::{
    CmdMessage, CmdResult, DashboardQuery, DashboardStats, DoctorReport, MessageLevel, PanelzPaths,
};
pub use crate::store::CandidateFilter;

pub struct PanelzApi<B: StorageBackend> {
    db: Db<B>,
    session: Session<B>,
    paths: PanelzPaths,
}

impl<B: StorageBackend> PanelzApi<B> {
    pub fn new(backend: B, paths: PanelzPaths) -> Self {
        Self::with_db(Db::new(backend), paths)
    }

    pub fn with_db(db: Db<B>, paths: PanelzPaths) -> Self {
        let session = Session::init(db.storage().clone());
        Self { db, session, paths }
    }

    pub fn db(&self) -> &Db<B> {
        &self.db
    }

    pub fn paths(&self) -> &PanelzPaths {
        &self.paths
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    fn logged_in(&self) -> Result<&User> {
        self.session.current_user().ok_or(PanelzError::NotLoggedIn)
    }

    // --- Session ---

    pub fn login(
        &mut self,
        identity: &dyn IdentityProvider,
        credentials: &Credentials,
        role: Role,
    ) -> Result<CmdResult> {
        commands::auth::login(&mut self.session, identity, credentials, role)
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        commands::auth::logout(&mut self.session)
    }

    pub fn whoami(&self) -> Result<CmdResult> {
        commands::auth::whoami(&self.session)
    }

    // --- Dashboard ---

    pub fn dashboard(&self, query: &DashboardQuery) -> Result<CmdResult> {
        access::require(&self.session, View::Dashboard)?;
        commands::dashboard::run(&self.db, query)
    }

    // --- Candidates ---

    pub fn list_candidates(&self, filter: &CandidateFilter) -> Result<CmdResult> {
        access::require(&self.session, View::CandidateList)?;
        commands::candidates::list(&self.db, filter)
    }

    pub fn show_candidate(&self, id: &str) -> Result<CmdResult> {
        access::require(&self.session, View::CandidateDetail)?;
        commands::candidates::show(&self.db, id)
    }

    pub fn create_candidate(&self, draft: NewCandidate) -> Result<CmdResult> {
        access::require(&self.session, View::ManageCandidates)?;
        commands::candidates::create(&self.db, draft)
    }

    pub fn edit_candidate(&self, id: &str, patch: CandidatePatch) -> Result<CmdResult> {
        access::require(&self.session, View::ManageCandidates)?;
        commands::candidates::edit(&self.db, id, patch)
    }

    pub fn delete_candidate(&self, id: &str) -> Result<CmdResult> {
        access::require(&self.session, View::ManageCandidates)?;
        commands::candidates::delete(&self.db, id)
    }

    // --- Interviewers ---

    pub fn list_interviewers(&self) -> Result<CmdResult> {
        self.logged_in()?;
        commands::interviewers::list(&self.db)
    }

    pub fn add_interviewer(&self, draft: NewInterviewer) -> Result<CmdResult> {
        access::require(&self.session, View::AddInterviewer)?;
        commands::interviewers::add(&self.db, draft)
    }

    pub fn set_interviewer_role(&self, id: &str, role: Role) -> Result<CmdResult> {
        access::require(&self.session, View::RoleManagement)?;
        commands::interviewers::set_role(&self.db, id, role)
    }

    pub fn remove_interviewer(&self, id: &str) -> Result<CmdResult> {
        access::require(&self.session, View::RoleManagement)?;
        commands::interviewers::remove(&self.db, id)
    }

    // --- Interviews ---

    pub fn list_interviews(&self, candidate_id: Option<&str>) -> Result<CmdResult> {
        access::require(&self.session, View::CandidateList)?;
        commands::interviews::list(&self.db, candidate_id)
    }

    pub fn get_interview(&self, id: &str) -> Result<CmdResult> {
        access::require(&self.session, View::CandidateList)?;
        commands::interviews::get(&self.db, id)
    }

    pub fn schedule_interview(&self, request: Schedule) -> Result<CmdResult> {
        access::require(&self.session, View::ScheduleInterviews)?;
        commands::interviews::schedule(&self.db, request)
    }

    pub fn remove_interview(&self, id: &str) -> Result<CmdResult> {
        access::require(&self.session, View::ScheduleInterviews)?;
        commands::interviews::remove(&self.db, id)
    }

    // --- Feedback ---

    pub fn list_feedback(&self, candidate_id: &str) -> Result<CmdResult> {
        access::require(&self.session, View::CandidateDetail)?;
        commands::feedback::list(&self.db, candidate_id)
    }

    /// The author role is always the submitting user's role.
    pub fn add_feedback(&self, mut draft: NewFeedback) -> Result<CmdResult> {
        let user = access::require(&self.session, View::SubmitFeedback)?;
        draft.author_role = Some(user.role);
        commands::feedback::add(&self.db, draft)
    }

    pub fn edit_feedback(&self, id: &str, patch: FeedbackPatch) -> Result<CmdResult> {
        access::require(&self.session, View::SubmitFeedback)?;
        commands::feedback::edit(&self.db, id, patch)
    }

    pub fn remove_feedback(&self, id: &str) -> Result<CmdResult> {
        access::require(&self.session, View::SubmitFeedback)?;
        commands::feedback::remove(&self.db, id)
    }

    // --- Maintenance ---

    pub fn doctor(&self) -> Result<CmdResult> {
        access::require(&self.session, View::Maintenance)?;
        commands::doctor::run(&self.db)
    }

    pub fn export(&self, dest: &Path) -> Result<CmdResult> {
        access::require(&self.session, View::Maintenance)?;
        commands::export::run(&self.db, dest)
    }

    pub fn import(&self, archive: &Path) -> Result<CmdResult> {
        access::require(&self.session, View::Maintenance)?;
        commands::import::run(&self.db, archive)
    }

    /// Local configuration; not gated.
    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Profile, StaticIdentity};
    use crate::store::mem_backend::MemBackend;
    use std::path::PathBuf;

    fn api() -> PanelzApi<MemBackend> {
        PanelzApi::new(
            MemBackend::new(),
            PanelzPaths {
                data: PathBuf::from("/unused"),
            },
        )
    }

    fn log_in(api: &mut PanelzApi<MemBackend>, role: Role) {
        let credentials = Credentials {
            username: "emilys".into(),
            password: "emilyspass".into(),
        };
        let identity = StaticIdentity::new(
            credentials.clone(),
            Profile {
                id: "1".into(),
                username: "emilys".into(),
                email: None,
                image: None,
                first_name: None,
                last_name: None,
            },
        );
        api.login(&identity, &credentials, role).unwrap();
    }

    fn ada() -> NewCandidate {
        NewCandidate {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        }
    }

    #[test]
    fn everything_but_session_needs_login() {
        let api = api();
        assert!(matches!(
            api.list_candidates(&CandidateFilter::default()),
            Err(PanelzError::NotLoggedIn)
        ));
        assert!(matches!(api.list_interviewers(), Err(PanelzError::NotLoggedIn)));
        assert!(api.whoami().unwrap().user.is_none());
    }

    #[test]
    fn panelist_cannot_manage_candidates() {
        let mut api = api();
        log_in(&mut api, Role::Panelist);
        assert!(matches!(
            api.create_candidate(ada()),
            Err(PanelzError::Forbidden {
                role: Role::Panelist,
                ..
            })
        ));
        assert!(api.db().candidates().list().is_empty());
    }

    #[test]
    fn ta_member_creates_and_panelist_reviews() {
        let mut api = api();
        log_in(&mut api, Role::TaMember);
        let created = api.create_candidate(ada()).unwrap();
        let id = created.candidates[0].id.clone();
        assert!(matches!(api.doctor(), Err(PanelzError::Forbidden { .. })));

        log_in(&mut api, Role::Panelist);
        let result = api
            .add_feedback(NewFeedback {
                candidate_id: id.clone(),
                score: 4,
                strengths: "Clear".into(),
                improvements: "Tests".into(),
                author_role: None,
            })
            .unwrap();
        assert_eq!(result.feedback[0].author_role, Some(Role::Panelist));
        assert_eq!(api.list_feedback(&id).unwrap().feedback.len(), 1);
    }

    #[test]
    fn admin_cannot_submit_feedback() {
        let mut api = api();
        log_in(&mut api, Role::Admin);
        let created = api.create_candidate(ada()).unwrap();
        let id = created.candidates[0].id.clone();
        let err = api
            .add_feedback(NewFeedback {
                candidate_id: id,
                score: 3,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, PanelzError::Forbidden { .. }));
    }

    #[test]
    fn logout_closes_the_gate() {
        let mut api = api();
        log_in(&mut api, Role::Admin);
        assert!(api.doctor().is_ok());
        api.logout().unwrap();
        assert!(matches!(api.doctor(), Err(PanelzError::NotLoggedIn)));
    }
}
