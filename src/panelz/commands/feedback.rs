use super::{existing_candidate, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{FeedbackPatch, NewFeedback};
use crate::store::{Db, StorageBackend};

pub fn list<B: StorageBackend>(db: &Db<B>, candidate_id: &str) -> Result<CmdResult> {
    let candidate = existing_candidate(db, candidate_id)?;
    let feedback = db.feedback().list_by_candidate(&candidate.id);
    let mut result = CmdResult::default();
    if feedback.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No feedback for {} yet.",
            candidate.full_name()
        )));
    }
    Ok(result
        .with_candidates(vec![candidate])
        .with_feedback(feedback))
}

pub fn add<B: StorageBackend>(db: &Db<B>, draft: NewFeedback) -> Result<CmdResult> {
    let candidate = existing_candidate(db, &draft.candidate_id)?;
    let entry = db.feedback().create(draft)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Feedback recorded ({}) for {}: {}/5",
        entry.id,
        candidate.full_name(),
        entry.score
    )));
    Ok(result.with_feedback(vec![entry]))
}

pub fn edit<B: StorageBackend>(db: &Db<B>, id: &str, patch: FeedbackPatch) -> Result<CmdResult> {
    let entry = db.feedback().update(id, patch)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Feedback updated ({}): {}/5",
        entry.id, entry.score
    )));
    Ok(result.with_feedback(vec![entry]))
}

pub fn remove<B: StorageBackend>(db: &Db<B>, id: &str) -> Result<CmdResult> {
    let entry = db.feedback().delete(id)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Feedback deleted ({})", entry.id)));
    Ok(result.with_feedback(vec![entry]))
}

/// Mean score, `None` without feedback.
pub fn average_score(entries: &[crate::model::Feedback]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let total: u32 = entries.iter().map(|f| u32::from(f.score)).sum();
    Some(f64::from(total) / entries.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelzError;
    use crate::model::Role;
    use crate::store::mem_backend::fixtures::DbFixture;

    fn draft(candidate_id: &str, score: u8) -> NewFeedback {
        NewFeedback {
            candidate_id: candidate_id.into(),
            score,
            strengths: "Systems thinking".into(),
            improvements: "Pace".into(),
            author_role: Some(Role::Panelist),
        }
    }

    #[test]
    fn add_requires_existing_candidate() {
        let fixture = DbFixture::new();
        let err = add(&fixture.db, draft("5", 4)).unwrap_err();
        assert!(matches!(err, PanelzError::NotFound { kind: "candidate", .. }));
    }

    #[test]
    fn score_six_is_rejected() {
        let fixture = DbFixture::new().with_candidates(1);
        let cid = fixture.db.candidates().list()[0].id.clone();
        let err = add(&fixture.db, draft(&cid, 6)).unwrap_err();
        assert!(matches!(err, PanelzError::Validation { kind: "feedback", .. }));
        assert!(fixture.db.feedback().list().is_empty());
    }

    #[test]
    fn list_and_average() {
        let fixture = DbFixture::new().with_candidates(1);
        let cid = fixture.db.candidates().list()[0].id.clone();
        add(&fixture.db, draft(&cid, 4)).unwrap();
        add(&fixture.db, draft(&cid, 5)).unwrap();

        let result = list(&fixture.db, &cid).unwrap();
        assert_eq!(result.feedback.len(), 2);
        assert_eq!(average_score(&result.feedback), Some(4.5));
        assert_eq!(average_score(&[]), None);
    }

    #[test]
    fn edit_and_remove() {
        let fixture = DbFixture::new().with_candidates(1);
        let cid = fixture.db.candidates().list()[0].id.clone();
        let id = add(&fixture.db, draft(&cid, 2)).unwrap().feedback[0].id.clone();

        edit(
            &fixture.db,
            &id,
            FeedbackPatch {
                score: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(fixture.db.feedback().get(&id).unwrap().score, 3);

        remove(&fixture.db, &id).unwrap();
        assert!(fixture.db.feedback().get(&id).is_none());
        assert!(remove(&fixture.db, &id).is_err());
    }
}
