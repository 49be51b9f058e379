//! Interview listing and the scheduling flow.
//!
//! Scheduling writes twice: first the interview (created, or updated when an
//! interview id is given), then the candidate's status, which follows the
//! interview's status. The two writes are independent. A rescheduled
//! interview must already belong to the requested candidate.

use super::{existing_candidate, CmdMessage, CmdResult};
use crate::error::{PanelzError, Result};
use crate::model::{CandidatePatch, InterviewPatch, NewInterview, Status};
use crate::store::collection::by_date_desc;
use crate::store::{Db, StorageBackend};

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    /// Reschedule this interview instead of creating a new one.
    pub interview_id: Option<String>,
    pub candidate_id: String,
    pub interviewer_id: String,
    pub date: String,
    pub status: Status,
    pub notes: Option<String>,
}

pub fn list<B: StorageBackend>(db: &Db<B>, candidate_id: Option<&str>) -> Result<CmdResult> {
    let interviews = match candidate_id {
        Some(id) => {
            existing_candidate(db, id)?;
            db.interviews().list_by_candidate(id)
        }
        None => {
            let mut all = db.interviews().list();
            by_date_desc(&mut all);
            all
        }
    };
    let mut result = CmdResult::default();
    if interviews.is_empty() {
        result.add_message(CmdMessage::info("No interviews scheduled."));
    }
    Ok(result
        .with_interviews(interviews)
        .with_interviewers(db.interviewers().list()))
}

pub fn get<B: StorageBackend>(db: &Db<B>, id: &str) -> Result<CmdResult> {
    let interview = db
        .interviews()
        .get(id)
        .ok_or_else(|| PanelzError::not_found("interview", id))?;
    Ok(CmdResult::default().with_interviews(vec![interview]))
}

pub fn schedule<B: StorageBackend>(db: &Db<B>, request: Schedule) -> Result<CmdResult> {
    let candidate = existing_candidate(db, &request.candidate_id)?;
    if db.interviewers().get(&request.interviewer_id).is_none() {
        return Err(PanelzError::not_found("interviewer", &request.interviewer_id));
    }

    let (interview, verb) = match &request.interview_id {
        Some(id) => {
            let existing = db
                .interviews()
                .get(id)
                .ok_or_else(|| PanelzError::not_found("interview", id))?;
            if existing.candidate_id != candidate.id {
                return Err(PanelzError::validation(
                    "interview",
                    format!(
                        "{} belongs to candidate {}, not {}",
                        id, existing.candidate_id, candidate.id
                    ),
                ));
            }
            let patch = InterviewPatch {
                candidate_id: None,
                interviewer_id: Some(request.interviewer_id.clone()),
                date: Some(request.date.clone()),
                status: Some(request.status),
                notes: request.notes.clone(),
            };
            (db.interviews().update(id, patch)?, "updated")
        }
        None => {
            let draft = NewInterview {
                candidate_id: candidate.id.clone(),
                interviewer_id: request.interviewer_id.clone(),
                date: request.date.clone(),
                status: request.status,
                notes: request.notes.clone(),
            };
            (db.interviews().create(draft)?, "scheduled")
        }
    };

    let candidate = db
        .candidates()
        .update(&candidate.id, CandidatePatch::status(interview.status))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Interview {} ({}): {} on {}",
        verb,
        interview.id,
        candidate.full_name(),
        interview.date
    )));
    Ok(result
        .with_interviews(vec![interview])
        .with_candidates(vec![candidate]))
}

pub fn remove<B: StorageBackend>(db: &Db<B>, id: &str) -> Result<CmdResult> {
    let interview = db.interviews().delete(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Interview deleted ({}) on {}",
        interview.id, interview.date
    )));
    Ok(result.with_interviews(vec![interview]))
}
