use chrono::{DateTime, Utc};
use colored::Colorize;
use panelz::api::{CmdMessage, CmdResult, DashboardStats, DoctorReport, MessageLevel};
use panelz::commands::feedback::average_score;
use panelz::config::PanelzConfig;
use panelz::error::PanelzError;
use panelz::model::{Candidate, Feedback, Interview, Interviewer, Status, User};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ID_WIDTH: usize = 12;
const NAME_WIDTH: usize = 26;
const FIELD_WIDTH: usize = 22;
const DATE_WIDTH: usize = 18;
const TIME_WIDTH: usize = 14;

pub fn print_error(error: &PanelzError) {
    eprintln!("{} {}", "Error:".red(), error);
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_user(user: &User) {
    println!("{} ({})", user.display_name().bold(), user.username);
    println!("  role  {}", user.role.to_string().cyan());
    if let Some(email) = &user.email {
        println!("  email {}", email);
    }
}

pub(super) fn print_candidates(candidates: &[Candidate]) {
    for c in candidates {
        println!(
            "{} {} {} {}",
            cell(&c.id, ID_WIDTH).dimmed(),
            cell(&c.full_name(), NAME_WIDTH),
            cell(c.designation.as_deref().unwrap_or("-"), FIELD_WIDTH),
            status_label(c.status)
        );
    }
}

pub(super) fn print_candidate_detail(result: &CmdResult) {
    let Some(c) = result.candidates.first() else {
        return;
    };
    println!("{}  {}", c.full_name().bold(), status_label(c.status));
    println!("  id          {}", c.id.dimmed());
    println!("  email       {}", c.email.as_deref().unwrap_or("-"));
    println!("  department  {}", c.department.as_deref().unwrap_or("-"));
    println!("  designation {}", c.designation.as_deref().unwrap_or("-"));

    println!();
    println!("{}", "Interviews".bold());
    if result.interviews.is_empty() {
        println!("  {}", "none".dimmed());
    } else {
        print_interviews(&result.interviews, &result.interviewers);
    }

    println!();
    match average_score(&result.feedback) {
        Some(avg) => println!("{} (average {:.1}/5)", "Feedback".bold(), avg),
        None => println!("{}", "Feedback".bold()),
    }
    if result.feedback.is_empty() {
        println!("  {}", "none".dimmed());
    } else {
        print_feedback(&result.feedback);
    }
}

pub(super) fn print_interviewers(interviewers: &[Interviewer]) {
    for i in interviewers {
        println!(
            "{} {} {} {}",
            cell(&i.id, ID_WIDTH).dimmed(),
            cell(&i.name, NAME_WIDTH),
            cell(&i.email, FIELD_WIDTH + 8),
            i.role.to_string().cyan()
        );
    }
}

/// `interviewers` is used to resolve names; unknown ids are shown as-is.
pub(super) fn print_interviews(interviews: &[Interview], interviewers: &[Interviewer]) {
    for iv in interviews {
        let who = interviewers
            .iter()
            .find(|i| i.id == iv.interviewer_id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| iv.interviewer_id.clone());
        println!(
            "{} {} {} {} {}",
            cell(&iv.id, ID_WIDTH).dimmed(),
            cell(&iv.date, DATE_WIDTH),
            cell(&who, NAME_WIDTH),
            status_label(iv.status),
            iv.notes.as_deref().unwrap_or("").dimmed()
        );
    }
}

pub(super) fn print_feedback(entries: &[Feedback]) {
    for f in entries {
        let author = f
            .author_role
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {} {} {}",
            cell(&f.id, ID_WIDTH).dimmed(),
            score_label(f.score),
            cell(&author, 10),
            format_time_ago(f.created_at).dimmed()
        );
        if !f.strengths.is_empty() {
            println!("    {} {}", "+".green(), f.strengths);
        }
        if !f.improvements.is_empty() {
            println!("    {} {}", "-".yellow(), f.improvements);
        }
    }
}

pub(super) fn print_stats(stats: &DashboardStats) {
    println!(
        "{} {} to {}",
        "Dashboard".bold(),
        stats.from,
        stats.to
    );
    println!("  interviews      {}", stats.interviews_in_range);
    println!("  candidates seen {}", stats.candidates_in_range);
    println!("  completed       {}", stats.completed_in_range);
    println!();
    println!(
        "  {} candidates, {} interviewers",
        stats.total_candidates, stats.total_interviewers
    );
    for (status, count) in &stats.candidates_by_status {
        println!("  {:<15} {}", status, count);
    }
}

pub(super) fn print_report(report: &DoctorReport) {
    println!("  orphaned interviews   {}", report.orphaned_interviews);
    println!("  orphaned feedback     {}", report.orphaned_feedback);
    println!("  unassigned interviews {}", report.unassigned_interviews);
}

pub(super) fn print_config(config: &PanelzConfig) {
    for (key, value) in config.entries() {
        println!("{} = {}", key, value);
    }
}

fn status_label(status: Status) -> colored::ColoredString {
    match status {
        Status::Scheduled => status.as_str().blue(),
        Status::Completed => status.as_str().green(),
        Status::Cancelled => status.as_str().red(),
    }
}

fn score_label(score: u8) -> String {
    let filled = usize::from(score.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Truncates to `width` columns and pads to exactly `width`.
fn cell(s: &str, width: usize) -> String {
    let text = truncate_to_width(s, width);
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Ada", 10), "Ada");
    }

    #[test]
    fn truncate_marks_cut_text() {
        let cut = truncate_to_width("Ada Lovelace", 6);
        assert_eq!(cut, "Ada L…");
        assert_eq!(cut.width(), 6);
    }

    #[test]
    fn truncate_counts_wide_chars() {
        let cut = truncate_to_width("日本語のテキスト", 7);
        assert!(cut.width() <= 7);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn cell_pads_to_width() {
        assert_eq!(cell("ab", 4), "ab  ");
    }

    #[test]
    fn score_stars() {
        assert_eq!(score_label(3), "★★★☆☆");
    }
}
