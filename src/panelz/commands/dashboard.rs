//! Dashboard figures for a date window.
//!
//! Interviews are counted when their date falls between the start of `from`
//! and the end of `to` (inclusive, local time), optionally narrowed to one
//! interviewer. Interviews whose date cannot be parsed are left out.

use super::CmdResult;
use crate::error::{PanelzError, Result};
use crate::model::Status;
use crate::store::{Db, StorageBackend};
use crate::validation::parse_datetime;
use chrono::{Days, Local, NaiveDate, NaiveTime};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub interviewer_id: Option<String>,
}

impl DashboardQuery {
    /// The last `days` days up to and including today.
    pub fn last_days(days: u32) -> Self {
        let today = Local::now().date_naive();
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(today);
        Self {
            from,
            to: today,
            interviewer_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub interviews_in_range: usize,
    /// Distinct candidates among the interviews in range.
    pub candidates_in_range: usize,
    pub completed_in_range: usize,
    pub total_candidates: usize,
    pub total_interviewers: usize,
    /// Candidates per status, over all candidates.
    pub candidates_by_status: BTreeMap<&'static str, usize>,
}

pub fn run<B: StorageBackend>(db: &Db<B>, query: &DashboardQuery) -> Result<CmdResult> {
    if query.from > query.to {
        return Err(PanelzError::Api(format!(
            "Invalid range: {} is after {}",
            query.from, query.to
        )));
    }

    let start = query.from.and_time(NaiveTime::MIN);
    let end = query
        .to
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| query.to.and_time(NaiveTime::MIN));

    let in_range: Vec<_> = db
        .interviews()
        .list()
        .into_iter()
        .filter(|iv| match parse_datetime(&iv.date) {
            Some(when) => when >= start && when <= end,
            None => false,
        })
        .filter(|iv| match &query.interviewer_id {
            Some(id) => &iv.interviewer_id == id,
            None => true,
        })
        .collect();

    let distinct: HashSet<&str> = in_range.iter().map(|iv| iv.candidate_id.as_str()).collect();
    let completed = in_range
        .iter()
        .filter(|iv| iv.status == Status::Completed)
        .count();

    let candidates = db.candidates().list();
    let mut by_status: BTreeMap<&'static str, usize> =
        Status::all().iter().map(|s| (s.as_str(), 0)).collect();
    for c in &candidates {
        *by_status.entry(c.status.as_str()).or_default() += 1;
    }

    let stats = DashboardStats {
        from: query.from,
        to: query.to,
        interviews_in_range: in_range.len(),
        candidates_in_range: distinct.len(),
        completed_in_range: completed,
        total_candidates: candidates.len(),
        total_interviewers: db.interviewers().list().len(),
        candidates_by_status: by_status,
    };

    let mut result = CmdResult::default();
    result.stats = Some(stats);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewInterviewer, Role};
    use crate::store::mem_backend::fixtures::DbFixture;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn query(from: &str, to: &str) -> DashboardQuery {
        DashboardQuery {
            from: date(from),
            to: date(to),
            interviewer_id: None,
        }
    }

    #[test]
    fn counts_interviews_inside_window() {
        let fixture = DbFixture::new()
            .with_candidates(3)
            .with_interviewer("Grace", Role::Panelist)
            .with_interview(0, "2024-01-10T10:00", Status::Completed)
            .with_interview(0, "2024-01-11T23:30", Status::Scheduled)
            .with_interview(1, "2024-01-12T09:00", Status::Completed)
            .with_interview(2, "2024-02-01T09:00", Status::Completed);

        let stats = run(&fixture.db, &query("2024-01-10", "2024-01-12"))
            .unwrap()
            .stats
            .unwrap();
        assert_eq!(stats.interviews_in_range, 3);
        assert_eq!(stats.candidates_in_range, 2);
        assert_eq!(stats.completed_in_range, 2);
        assert_eq!(stats.total_candidates, 3);
        assert_eq!(stats.candidates_by_status["scheduled"], 3);
        assert_eq!(stats.candidates_by_status["cancelled"], 0);
    }

    #[test]
    fn filters_by_interviewer() {
        let fixture = DbFixture::new()
            .with_candidates(1)
            .with_interviewer("Grace", Role::Panelist)
            .with_interview(0, "2024-01-10T10:00", Status::Scheduled);
        let other = fixture
            .db
            .interviewers()
            .create(NewInterviewer {
                name: "Alan".into(),
                email: "alan@x.com".into(),
                role: Role::Panelist,
            })
            .unwrap();

        let mut q = query("2024-01-01", "2024-01-31");
        q.interviewer_id = Some(other.id);
        let stats = run(&fixture.db, &q).unwrap().stats.unwrap();
        assert_eq!(stats.interviews_in_range, 0);
        assert_eq!(stats.total_interviewers, 2);
    }

    #[test]
    fn rejects_inverted_range() {
        let fixture = DbFixture::new();
        assert!(run(&fixture.db, &query("2024-02-01", "2024-01-01")).is_err());
    }

    #[test]
    fn last_days_ends_today() {
        let q = DashboardQuery::last_days(7);
        assert_eq!(q.to, Local::now().date_naive());
        assert_eq!((q.to - q.from).num_days(), 7);
    }
}
