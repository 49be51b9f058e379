//! Record validation, applied by the stores before anything is persisted.
//!
//! The accept/reject boundaries are the ones the forms always enforced:
//! required names, an `a@b.c` email shape, a parseable interview date and a
//! feedback score between 1 and 5.

use crate::error::{PanelzError, Result};
use crate::model::{Candidate, Feedback, Interview, Interviewer};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

pub const SCORE_RANGE: RangeInclusive<u8> = 1..=5;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Parse an interview date as local wall-clock time. Accepts the
/// `datetime-local` shape (`2024-01-10T10:00`), optional seconds, RFC 3339
/// with an offset, and a bare date (midnight).
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// The stored form of an interview date: `YYYY-MM-DDTHH:MM`, with `:SS`
/// only when seconds are set. Every stored date uses it, so comparing the
/// strings orders them chronologically.
pub fn canonical_datetime(value: &str) -> Option<String> {
    let dt = parse_datetime(value)?;
    let format = if dt.second() == 0 && dt.nanosecond() == 0 {
        "%Y-%m-%dT%H:%M"
    } else {
        "%Y-%m-%dT%H:%M:%S"
    };
    Some(dt.format(format).to_string())
}

fn require(kind: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PanelzError::validation(kind, format!("{} is required", field)));
    }
    Ok(())
}

fn check_email(kind: &'static str, value: &str) -> Result<()> {
    if !is_email(value.trim()) {
        return Err(PanelzError::validation(
            kind,
            format!("'{}' is not a valid email", value),
        ));
    }
    Ok(())
}

pub fn candidate(c: &Candidate) -> Result<()> {
    require("candidate", "first name", &c.first_name)?;
    require("candidate", "last name", &c.last_name)?;
    match c.email.as_deref() {
        Some(email) if !email.trim().is_empty() => check_email("candidate", email),
        _ => Ok(()),
    }
}

pub fn interviewer(i: &Interviewer) -> Result<()> {
    require("interviewer", "name", &i.name)?;
    require("interviewer", "email", &i.email)?;
    check_email("interviewer", &i.email)
}

pub fn interview(i: &Interview) -> Result<()> {
    require("interview", "candidate", &i.candidate_id)?;
    require("interview", "interviewer", &i.interviewer_id)?;
    require("interview", "date", &i.date)?;
    if parse_datetime(&i.date).is_none() {
        return Err(PanelzError::validation(
            "interview",
            format!("'{}' is not an ISO-8601 date", i.date),
        ));
    }
    Ok(())
}

pub fn feedback(f: &Feedback) -> Result<()> {
    require("feedback", "candidate", &f.candidate_id)?;
    if !SCORE_RANGE.contains(&f.score) {
        return Err(PanelzError::validation(
            "feedback",
            format!(
                "score {} is out of range ({}-{})",
                f.score,
                SCORE_RANGE.start(),
                SCORE_RANGE.end()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_email("ada@x.com"));
        assert!(!is_email("ada@x"));
        assert!(!is_email("ada x@x.com"));
        assert!(!is_email("@x.com"));
        assert!(!is_email(""));
    }

    #[test]
    fn parses_datetime_local_shape() {
        let dt = parse_datetime("2024-01-10T10:00").unwrap();
        assert_eq!(dt.hour(), 10);
        assert!(parse_datetime("2024-01-10T10:00:30").is_some());
        assert!(parse_datetime("2024-01-10").is_some());
        assert!(parse_datetime("2024-01-10T10:00:00Z").is_some());
        assert!(parse_datetime("next tuesday").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn canonical_form_for_every_accepted_shape() {
        assert_eq!(canonical_datetime("2024-01-10T09:00").unwrap(), "2024-01-10T09:00");
        assert_eq!(canonical_datetime("2024-01-10 23:00").unwrap(), "2024-01-10T23:00");
        assert_eq!(canonical_datetime("2024-01-10T23:00:00").unwrap(), "2024-01-10T23:00");
        assert_eq!(canonical_datetime("2024-01-10 08:15:30").unwrap(), "2024-01-10T08:15:30");
        assert_eq!(canonical_datetime(" 2024-01-10 ").unwrap(), "2024-01-10T00:00");
        assert!(canonical_datetime("tomorrow").is_none());
    }
}
