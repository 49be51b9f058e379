//! Finds and removes orphaned records: interviews and feedback that point at a
//! candidate which no longer exists. Candidate deletes cascade, so orphans
//! only show up in data written by older versions or edited by hand.

use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{Db, StorageBackend};
use std::collections::HashSet;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub orphaned_interviews: usize,
    pub orphaned_feedback: usize,
    /// Interviews whose interviewer is gone. Reported, not removed.
    pub unassigned_interviews: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

pub fn run<B: StorageBackend>(db: &Db<B>) -> Result<CmdResult> {
    let candidates: HashSet<String> = db.candidates().list().into_iter().map(|c| c.id).collect();
    let interviewers: HashSet<String> = db
        .interviewers()
        .list()
        .into_iter()
        .map(|i| i.id)
        .collect();

    let interviews = db
        .interviews()
        .delete_where(|i| !candidates.contains(&i.candidate_id));
    let feedback = db
        .feedback()
        .delete_where(|f| !candidates.contains(&f.candidate_id));
    let unassigned = db
        .interviews()
        .list()
        .iter()
        .filter(|i| !interviewers.contains(&i.interviewer_id))
        .count();

    let report = DoctorReport {
        orphaned_interviews: interviews.len(),
        orphaned_feedback: feedback.len(),
        unassigned_interviews: unassigned,
    };

    let mut result = CmdResult::default();
    if report.is_clean() {
        result.add_message(CmdMessage::success("No issues found."));
    } else {
        if report.orphaned_interviews > 0 {
            result.add_message(CmdMessage::success(format!(
                "Removed {} interview(s) for deleted candidates.",
                report.orphaned_interviews
            )));
        }
        if report.orphaned_feedback > 0 {
            result.add_message(CmdMessage::success(format!(
                "Removed {} feedback entr{} for deleted candidates.",
                report.orphaned_feedback,
                if report.orphaned_feedback == 1 { "y" } else { "ies" }
            )));
        }
        if report.unassigned_interviews > 0 {
            result.add_message(CmdMessage::warning(format!(
                "{} interview(s) reference an interviewer that no longer exists.",
                report.unassigned_interviews
            )));
        }
    }
    result.report = Some(report);
    Ok(result
        .with_interviews(interviews)
        .with_feedback(feedback))
}
