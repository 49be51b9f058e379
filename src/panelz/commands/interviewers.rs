use super::{CmdMessage, CmdResult};
use crate::error::{PanelzError, Result};
use crate::model::{InterviewerPatch, NewInterviewer, Role};
use crate::store::{Db, StorageBackend};

pub fn list<B: StorageBackend>(db: &Db<B>) -> Result<CmdResult> {
    let interviewers = db.interviewers().list();
    let mut result = CmdResult::default();
    if interviewers.is_empty() {
        result.add_message(CmdMessage::info("No interviewers yet."));
    }
    Ok(result.with_interviewers(interviewers))
}

pub fn add<B: StorageBackend>(db: &Db<B>, draft: NewInterviewer) -> Result<CmdResult> {
    let interviewer = db.interviewers().create(draft)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Interviewer added ({}): {} [{}]",
        interviewer.id, interviewer.name, interviewer.role
    )));
    Ok(result.with_interviewers(vec![interviewer]))
}

pub fn set_role<B: StorageBackend>(db: &Db<B>, id: &str, role: Role) -> Result<CmdResult> {
    let interviewer = db.interviewers().update(
        id,
        InterviewerPatch {
            role: Some(role),
            ..Default::default()
        },
    )?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Role updated: {} is now {}",
        interviewer.name, interviewer.role
    )));
    Ok(result.with_interviewers(vec![interviewer]))
}

/// Refuses to remove an interviewer that interviews still point at.
pub fn remove<B: StorageBackend>(db: &Db<B>, id: &str) -> Result<CmdResult> {
    let assigned = db.interviews().list_by_interviewer(id);
    if !assigned.is_empty() {
        if db.interviewers().get(id).is_none() {
            return Err(PanelzError::not_found("interviewer", id));
        }
        return Err(PanelzError::InUse {
            kind: "interviewer",
            id: id.to_string(),
            count: assigned.len(),
        });
    }

    let interviewer = db.interviewers().delete(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Interviewer removed: {}",
        interviewer.name
    )));
    Ok(result.with_interviewers(vec![interviewer]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::store::mem_backend::fixtures::DbFixture;

    #[test]
    fn remove_is_blocked_while_referenced() {
        let fixture = DbFixture::new()
            .with_candidates(1)
            .with_interviewer("Grace", Role::Panelist)
            .with_interview(0, "2024-01-10T10:00", Status::Scheduled);
        let id = fixture.db.interviewers().list()[0].id.clone();

        let err = remove(&fixture.db, &id).unwrap_err();
        assert!(matches!(err, PanelzError::InUse { count: 1, .. }));
        assert!(fixture.db.interviewers().get(&id).is_some());
    }

    #[test]
    fn remove_unreferenced_interviewer() {
        let fixture = DbFixture::new().with_interviewer("Grace", Role::Panelist);
        let id = fixture.db.interviewers().list()[0].id.clone();
        remove(&fixture.db, &id).unwrap();
        assert!(fixture.db.interviewers().list().is_empty());
    }

    #[test]
    fn set_role_changes_only_role() {
        let fixture = DbFixture::new().with_interviewer("Grace", Role::Panelist);
        let before = fixture.db.interviewers().list()[0].clone();
        let result = set_role(&fixture.db, &before.id, Role::Admin).unwrap();
        let after = &result.interviewers[0];
        assert_eq!(after.role, Role::Admin);
        assert_eq!(after.name, before.name);
        assert_eq!(after.email, before.email);
    }

    #[test]
    fn add_rejects_bad_email() {
        let fixture = DbFixture::new();
        let err = add(
            &fixture.db,
            NewInterviewer {
                name: "Grace".into(),
                email: "grace-at-x".into(),
                role: Role::Panelist,
            },
        )
        .unwrap_err();
        assert!(matches!(err, PanelzError::Validation { .. }));
    }
}
