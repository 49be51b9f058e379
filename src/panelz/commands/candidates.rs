use super::{existing_candidate, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CandidatePatch, NewCandidate};
use crate::store::{CandidateFilter, Db, StorageBackend};

pub fn list<B: StorageBackend>(db: &Db<B>, filter: &CandidateFilter) -> Result<CmdResult> {
    let found = db.candidates().search(filter);
    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info("No candidates found."));
    }
    Ok(result.with_candidates(found))
}

/// A candidate with their interviews (newest first) and feedback.
pub fn show<B: StorageBackend>(db: &Db<B>, id: &str) -> Result<CmdResult> {
    let candidate = existing_candidate(db, id)?;
    let interviews = db.interviews().list_by_candidate(&candidate.id);
    let feedback = db.feedback().list_by_candidate(&candidate.id);
    Ok(CmdResult::default()
        .with_candidates(vec![candidate])
        .with_interviews(interviews)
        .with_feedback(feedback)
        .with_interviewers(db.interviewers().list()))
}

pub fn create<B: StorageBackend>(db: &Db<B>, draft: NewCandidate) -> Result<CmdResult> {
    let candidate = db.candidates().create(draft)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Candidate created ({}): {}",
        candidate.id,
        candidate.full_name()
    )));
    Ok(result.with_candidates(vec![candidate]))
}

pub fn edit<B: StorageBackend>(db: &Db<B>, id: &str, patch: CandidatePatch) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if patch.is_empty() {
        result.add_message(CmdMessage::info("Nothing to update."));
        return Ok(result.with_candidates(vec![existing_candidate(db, id)?]));
    }
    let candidate = db.candidates().update(id, patch)?;
    result.add_message(CmdMessage::success(format!(
        "Candidate updated ({}): {}",
        candidate.id,
        candidate.full_name()
    )));
    Ok(result.with_candidates(vec![candidate]))
}

/// Deletes a candidate together with their interviews and feedback.
pub fn delete<B: StorageBackend>(db: &Db<B>, id: &str) -> Result<CmdResult> {
    let candidate = db.candidates().delete(id)?;
    let interviews = db
        .interviews()
        .delete_where(|i| i.candidate_id == candidate.id);
    let feedback = db
        .feedback()
        .delete_where(|f| f.candidate_id == candidate.id);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Candidate deleted ({}): {}",
        candidate.id,
        candidate.full_name()
    )));
    if !interviews.is_empty() || !feedback.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Also removed {} interview(s) and {} feedback entr{}.",
            interviews.len(),
            feedback.len(),
            if feedback.len() == 1 { "y" } else { "ies" }
        )));
    }
    Ok(result
        .with_candidates(vec![candidate])
        .with_interviews(interviews)
        .with_feedback(feedback))
}
