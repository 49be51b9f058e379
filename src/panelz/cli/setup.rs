use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use panelz::model::{Role, Status};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "panelz", bin_name = "panelz", version, disable_help_subcommand = true)]
#[command(about = "Local-first interview management", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and choose the role to act as
    Login {
        username: String,

        /// Read from a hidden prompt when omitted
        #[arg(long)]
        password: Option<String>,

        /// Defaults to `default-role` from config
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Forget the logged-in user
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Interview figures for a date window
    Dashboard(DashboardArgs),

    /// Manage candidates
    #[command(subcommand)]
    Candidate(CandidateCommands),

    /// Manage interviewers
    #[command(subcommand)]
    Interviewer(InterviewerCommands),

    /// Schedule and track interviews
    #[command(subcommand)]
    Interview(InterviewCommands),

    /// Panel feedback on candidates
    #[command(subcommand)]
    Feedback(FeedbackCommands),

    /// Remove interviews and feedback left behind by deleted candidates
    Doctor,

    /// Write all collections to a .tar.gz archive
    Export {
        /// Directory to write the archive into (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Add records from an archive written by `export`
    Import { archive: PathBuf },

    /// Show or set configuration
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Look back this many days (default: `dashboard-days` from config)
    #[arg(short, long, conflicts_with = "from")]
    pub days: Option<u32>,

    /// Window start, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Window end, YYYY-MM-DD (default: today)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Only count this interviewer's interviews
    #[arg(short, long)]
    pub interviewer: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct CandidateFields {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub designation: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
}

#[derive(Subcommand, Debug)]
pub enum CandidateCommands {
    /// List candidates, optionally filtered
    List {
        /// Match first name, last name or email
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        designation: Option<String>,
        #[arg(long)]
        status: Option<Status>,
    },

    /// Show a candidate with interviews and feedback
    Show { id: String },

    /// Add a candidate
    Create {
        first_name: String,
        last_name: String,
        #[command(flatten)]
        fields: CandidateFields,
    },

    /// Change a candidate's fields
    Edit {
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[command(flatten)]
        fields: CandidateFields,
    },

    /// Delete a candidate with their interviews and feedback
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum InterviewerCommands {
    /// List interviewers
    List,

    /// Add an interviewer
    Add {
        name: String,
        email: String,
        #[arg(short, long, default_value = "panelist")]
        role: Role,
    },

    /// Change an interviewer's role
    SetRole { id: String, role: Role },

    /// Remove an interviewer with no interviews
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum InterviewCommands {
    /// List interviews, newest first
    List {
        #[arg(short, long)]
        candidate: Option<String>,
    },

    /// Schedule an interview; the candidate's status follows it
    Schedule {
        candidate_id: String,
        interviewer_id: String,
        /// ISO-8601, e.g. 2024-01-10T10:00
        date: String,
        #[arg(short, long, default_value = "scheduled")]
        status: Status,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Reschedule or update an interview
    Edit {
        id: String,
        #[arg(long)]
        interviewer: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(short, long)]
        status: Option<Status>,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an interview
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommands {
    /// Feedback for one candidate
    List { candidate_id: String },

    /// Submit feedback
    Add {
        candidate_id: String,
        /// 1 to 5
        #[arg(short, long)]
        score: u8,
        #[arg(long, default_value = "")]
        strengths: String,
        #[arg(long, default_value = "")]
        improvements: String,
    },

    /// Change submitted feedback
    Edit {
        id: String,
        #[arg(short, long)]
        score: Option<u8>,
        #[arg(long)]
        strengths: Option<String>,
        #[arg(long)]
        improvements: Option<String>,
    },

    /// Delete feedback
    Remove { id: String },
}
