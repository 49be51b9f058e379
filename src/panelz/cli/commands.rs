use super::render::{
    print_candidate_detail, print_candidates, print_config, print_feedback, print_interviewers,
    print_interviews, print_messages, print_report, print_stats, print_user,
};
use super::setup::{
    CandidateCommands, Cli, Commands, DashboardArgs, FeedbackCommands, InterviewCommands,
    InterviewerCommands,
};
use chrono::Local;
use clap::Parser;
use directories::ProjectDirs;
use panelz::api::{CandidateFilter, ConfigAction, DashboardQuery, PanelzApi, PanelzPaths, Schedule};
use panelz::config::PanelzConfig;
use panelz::error::{PanelzError, Result};
use panelz::identity::{Credentials, HttpIdentity};
use panelz::model::{
    CandidatePatch, FeedbackPatch, NewCandidate, NewFeedback, NewInterviewer, Role,
};
use panelz::store::fs_backend::FsBackend;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DATA_ENV: &str = "PANELZ_DATA";
const IDENTITY_ENV: &str = "PANELZ_IDENTITY_URL";
const LOG_ENV: &str = "PANELZ_LOG";

struct AppContext {
    api: PanelzApi<FsBackend>,
    config: PanelzConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = init_context()?;

    match cli.command {
        Commands::Login {
            username,
            password,
            role,
        } => handle_login(&mut ctx, username, password, role),
        Commands::Logout => handle_logout(&mut ctx),
        Commands::Whoami => handle_whoami(&ctx),
        Commands::Dashboard(args) => handle_dashboard(&ctx, args),
        Commands::Candidate(cmd) => handle_candidate(&ctx, cmd),
        Commands::Interviewer(cmd) => handle_interviewer(&ctx, cmd),
        Commands::Interview(cmd) => handle_interview(&ctx, cmd),
        Commands::Feedback(cmd) => handle_feedback(&ctx, cmd),
        Commands::Doctor => handle_doctor(&ctx),
        Commands::Export { dir } => handle_export(&ctx, dir),
        Commands::Import { archive } => handle_import(&ctx, archive),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "panelz", "panelz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PanelzError::Api("Could not determine data directory".into()))
}

fn init_context() -> Result<AppContext> {
    let data = data_dir()?;
    debug!(data = %data.display(), "using data directory");

    let config = PanelzConfig::load_or_default(&data);
    let api = PanelzApi::new(FsBackend::new(data.clone()), PanelzPaths { data });
    Ok(AppContext { api, config })
}

// --- Session ---

fn handle_login(
    ctx: &mut AppContext,
    username: String,
    password: Option<String>,
    role: Option<Role>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };
    let endpoint =
        std::env::var(IDENTITY_ENV).unwrap_or_else(|_| ctx.config.identity_url.clone());
    let identity = HttpIdentity::new(endpoint)?;
    let credentials = Credentials { username, password };
    let role = role.unwrap_or(ctx.config.default_role);

    let result = ctx.api.login(&identity, &credentials, role)?;
    print_messages(&result.messages);
    Ok(())
}

fn prompt_password() -> Result<String> {
    let term = console::Term::stderr();
    term.write_str("Password: ").map_err(PanelzError::Io)?;
    term.read_secure_line().map_err(PanelzError::Io)
}

fn handle_logout(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.logout()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.whoami()?;
    if let Some(user) = &result.user {
        print_user(user);
    }
    print_messages(&result.messages);
    Ok(())
}

// --- Dashboard ---

fn handle_dashboard(ctx: &AppContext, args: DashboardArgs) -> Result<()> {
    let mut query = match args.from {
        Some(from) => DashboardQuery {
            from,
            to: args.to.unwrap_or_else(|| Local::now().date_naive()),
            interviewer_id: None,
        },
        None => DashboardQuery::last_days(args.days.unwrap_or(ctx.config.dashboard_days)),
    };
    query.interviewer_id = args.interviewer;

    let result = ctx.api.dashboard(&query)?;
    if let Some(stats) = &result.stats {
        print_stats(stats);
    }
    print_messages(&result.messages);
    Ok(())
}

// --- Candidates ---

fn handle_candidate(ctx: &AppContext, cmd: CandidateCommands) -> Result<()> {
    let result = match cmd {
        CandidateCommands::List {
            search,
            department,
            designation,
            status,
        } => {
            let filter = CandidateFilter {
                query: search,
                department,
                designation,
                status,
            };
            let result = ctx.api.list_candidates(&filter)?;
            print_candidates(&result.candidates);
            result
        }
        CandidateCommands::Show { id } => {
            let result = ctx.api.show_candidate(&id)?;
            print_candidate_detail(&result);
            result
        }
        CandidateCommands::Create {
            first_name,
            last_name,
            fields,
        } => ctx.api.create_candidate(NewCandidate {
            first_name,
            last_name,
            email: fields.email,
            department: fields.department,
            designation: fields.designation,
            status: fields.status,
        })?,
        CandidateCommands::Edit {
            id,
            first_name,
            last_name,
            fields,
        } => ctx.api.edit_candidate(
            &id,
            CandidatePatch {
                first_name,
                last_name,
                email: fields.email,
                department: fields.department,
                designation: fields.designation,
                status: fields.status,
            },
        )?,
        CandidateCommands::Delete { id } => ctx.api.delete_candidate(&id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

// --- Interviewers ---

fn handle_interviewer(ctx: &AppContext, cmd: InterviewerCommands) -> Result<()> {
    let result = match cmd {
        InterviewerCommands::List => {
            let result = ctx.api.list_interviewers()?;
            print_interviewers(&result.interviewers);
            result
        }
        InterviewerCommands::Add { name, email, role } => {
            ctx.api
                .add_interviewer(NewInterviewer { name, email, role })?
        }
        InterviewerCommands::SetRole { id, role } => ctx.api.set_interviewer_role(&id, role)?,
        InterviewerCommands::Remove { id } => ctx.api.remove_interviewer(&id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

// --- Interviews ---

fn handle_interview(ctx: &AppContext, cmd: InterviewCommands) -> Result<()> {
    let result = match cmd {
        InterviewCommands::List { candidate } => {
            let result = ctx.api.list_interviews(candidate.as_deref())?;
            print_interviews(&result.interviews, &result.interviewers);
            result
        }
        InterviewCommands::Schedule {
            candidate_id,
            interviewer_id,
            date,
            status,
            notes,
        } => ctx.api.schedule_interview(Schedule {
            interview_id: None,
            candidate_id,
            interviewer_id,
            date,
            status,
            notes,
        })?,
        InterviewCommands::Edit {
            id,
            interviewer,
            date,
            status,
            notes,
        } => {
            let existing = ctx
                .api
                .get_interview(&id)?
                .interviews
                .pop()
                .ok_or_else(|| PanelzError::not_found("interview", &id))?;
            ctx.api.schedule_interview(Schedule {
                interview_id: Some(existing.id),
                candidate_id: existing.candidate_id,
                interviewer_id: interviewer.unwrap_or(existing.interviewer_id),
                date: date.unwrap_or(existing.date),
                status: status.unwrap_or(existing.status),
                notes,
            })?
        }
        InterviewCommands::Remove { id } => ctx.api.remove_interview(&id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

// --- Feedback ---

fn handle_feedback(ctx: &AppContext, cmd: FeedbackCommands) -> Result<()> {
    let result = match cmd {
        FeedbackCommands::List { candidate_id } => {
            let result = ctx.api.list_feedback(&candidate_id)?;
            print_feedback(&result.feedback);
            result
        }
        FeedbackCommands::Add {
            candidate_id,
            score,
            strengths,
            improvements,
        } => ctx.api.add_feedback(NewFeedback {
            candidate_id,
            score,
            strengths,
            improvements,
            author_role: None,
        })?,
        FeedbackCommands::Edit {
            id,
            score,
            strengths,
            improvements,
        } => ctx.api.edit_feedback(
            &id,
            FeedbackPatch {
                score,
                strengths,
                improvements,
                author_role: None,
            },
        )?,
        FeedbackCommands::Remove { id } => ctx.api.remove_feedback(&id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

// --- Maintenance ---

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    if let Some(report) = &result.report {
        print_report(report);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, dir: Option<PathBuf>) -> Result<()> {
    let dest = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(PanelzError::Io)?,
    };
    let result = ctx.api.export(&dest)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &AppContext, archive: PathBuf) -> Result<()> {
    let result = ctx.api.import(&archive)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let result = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
