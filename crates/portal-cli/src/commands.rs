use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow, bail};
use portal_ai::{AiService, HttpAiClient};
use portal_cli::config::Settings;
use portal_cli::script::{BrowseSteps, parse_script};
use portal_cli::seed::seed_library;
use portal_model::{Resource, UserId};
use portal_nav::{NavEvent, Outcome, Section};
use portal_persistence::LibraryStore;
use portal_session::{PaperDraft, Session, SessionError};
use tracing::{debug, info, info_span};

use crate::cli::{AdminCommand, BrowseArgs, Command, QuizArgs, ReplayArgs, SubmitArgs};
use crate::render::{
    print_history, print_questions, print_screen, print_sections, print_submissions,
    print_write_report,
};

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub settings: Settings,
    /// Where the settings came from (or would be written to).
    pub settings_path: Option<PathBuf>,
    pub library: PathBuf,
    pub user: Option<UserId>,
    /// Set for commands that talk to the assistant.
    pub ai: Option<Arc<HttpAiClient>>,
}

type PortalSession = Session<LibraryStore>;

pub async fn run(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init => run_init(ctx),
        Command::Sections => {
            print_sections();
            Ok(())
        }
        Command::Browse(args) => run_browse(args, ctx).await,
        Command::Replay(args) => run_replay(&args, ctx).await,
        Command::Saved => run_saved(ctx).await,
        Command::Download { id } => {
            let mut session = open_session(ctx).await?;
            let url = session.record_download(&id)?;
            println!("{url}");
            finish(&mut session).await;
            Ok(())
        }
        Command::Favorite { id } => {
            let mut session = open_session(ctx).await?;
            let saved = session.toggle_favorite(&id)?;
            println!("{id} {}", if saved { "saved" } else { "removed" });
            finish(&mut session).await;
            Ok(())
        }
        Command::Submit(args) => run_submit(args, ctx).await,
        Command::Admin { command } => run_admin(command, ctx).await,
        Command::Ask { text } => {
            let session = open_session(ctx).await?;
            let answer = session.ask(&text.join(" ")).await?;
            println!("{answer}");
            Ok(())
        }
        Command::Quiz(args) => run_quiz(args, ctx).await,
        Command::History => {
            let session = open_session(ctx).await?;
            print_history(&session.assessment_history().await?);
            Ok(())
        }
    }
}

fn run_init(ctx: &Context) -> Result<()> {
    let store = LibraryStore::open(&ctx.library)
        .with_context(|| format!("open library {}", ctx.library.display()))?;
    seed_library(&store)?;
    println!("Library ready at {}", ctx.library.display());

    if let Some(path) = &ctx.settings_path
        && !path.exists()
    {
        ctx.settings.save_to(path)?;
        println!("Settings written to {}", path.display());
    }
    Ok(())
}

async fn run_browse(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let steps = BrowseSteps {
        navigate: args.nav,
        subject: args.subject,
        pattern: args.pattern,
        degree: args.degree,
        college: args.college,
        semester: args.semester,
        resource_type: args.resource_type,
        year: args.year,
    };
    let mut session = open_session(ctx).await?;
    for event in steps.events() {
        apply_event(&mut session, &event)?;
    }
    print_screen(&mut session, ctx.settings.general.show_placeholder);
    Ok(())
}

async fn run_replay(args: &ReplayArgs, ctx: &Context) -> Result<()> {
    let text = fs::read_to_string(&args.script)
        .with_context(|| format!("read script {}", args.script.display()))?;
    let steps = parse_script(&text)?;
    let mut session = open_session(ctx).await?;

    let span = info_span!("replay", script = %args.script.display());
    let _guard = span.enter();
    for step in &steps {
        apply_event(&mut session, &step.event)
            .with_context(|| format!("line {}: {}", step.line, step.event))?;
        if args.each {
            println!("# {}", step.event);
            print_screen(&mut session, ctx.settings.general.show_placeholder);
        }
    }
    info!(steps = steps.len(), "script applied");
    if !args.each {
        print_screen(&mut session, ctx.settings.general.show_placeholder);
    }
    Ok(())
}

/// Dispatch one event, reporting a login prompt instead of failing.
fn apply_event(session: &mut PortalSession, event: &NavEvent) -> Result<()> {
    match session.dispatch(event) {
        Ok(Outcome::Moved { from, to }) => {
            debug!(%from, %to, "moved");
            Ok(())
        }
        Ok(Outcome::LoginRequired) => {
            eprintln!("note: `{event}` needs a logged-in user (pass --user)");
            Ok(())
        }
        Err(SessionError::Nav(err)) => Err(anyhow!(err.user_message())),
        Err(err) => Err(err.into()),
    }
}

async fn run_saved(ctx: &Context) -> Result<()> {
    let mut session = open_session(ctx).await?;
    if !session.is_logged_in() {
        bail!("saved resources need a user (pass --user)");
    }
    apply_event(&mut session, &NavEvent::navigate(Section::Saved))?;
    print_screen(&mut session, false);
    Ok(())
}

async fn run_submit(args: SubmitArgs, ctx: &Context) -> Result<()> {
    let mut session = open_session(ctx).await?;
    let draft = PaperDraft {
        title: args.title,
        subject_id: args.subject,
        college_id: args.college,
        semester: args.semester,
        year: args.year,
        resource_type: args.resource_type,
        pattern: args.pattern,
        degree_level: args.degree,
    };
    let submission = session.submit_paper(draft, &args.file).await?;
    println!(
        "Submitted {} ({}, {}) for review",
        submission.id, submission.title, submission.size
    );
    finish(&mut session).await;
    Ok(())
}

async fn run_admin(command: AdminCommand, ctx: &Context) -> Result<()> {
    let mut session = open_session(ctx).await?;
    match command {
        AdminCommand::Pending => {
            print_submissions(&session.pending_submissions().await?);
        }
        AdminCommand::Approve { id, note } => {
            let resource = session.approve_submission(&id, note).await?;
            println!("Approved {id}; published as {}", resource.id);
        }
        AdminCommand::Reject { id, note } => {
            session.reject_submission(&id, note).await?;
            println!("Rejected {id}");
        }
        AdminCommand::Purge { id } => {
            session.delete_submission(&id).await?;
            println!("Deleted submission {id}");
        }
        AdminCommand::Delete { id } => {
            let removed = session.delete_resource(&id)?;
            println!("Deleted {} ({})", removed.id, removed.title);
        }
        AdminCommand::SetUrl { id, url } => {
            session.set_download_url(&id, &url)?;
            println!("Updated download URL for {id}");
        }
        AdminCommand::Import { file } => {
            let resources = read_resources(&file)?;
            let total = resources.len();
            let added = session.import_resources(resources)?;
            println!("Imported {added} of {total} resources");
        }
    }
    finish(&mut session).await;
    Ok(())
}

fn read_resources(path: &Path) -> Result<Vec<Resource>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read resources from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse resources in {}", path.display()))
}

async fn run_quiz(args: QuizArgs, ctx: &Context) -> Result<()> {
    let mut session = open_session(ctx).await?;
    let assessment = session
        .generate_assessment(&args.subject, args.semester, &args.topic)
        .await?;
    println!(
        "{} - semester {} - {} ({} marks)",
        assessment.subject_name,
        assessment.semester,
        assessment.topic,
        assessment.total_marks()
    );
    print_questions(&assessment.questions);

    let expected = assessment.questions.len();
    let answers = match args.answers {
        Some(path) => read_answers_file(&path)?,
        None => tokio::task::spawn_blocking(move || prompt_answers(expected))
            .await
            .context("read answers")??,
    };

    let record = session.submit_assessment(&assessment, answers).await?;
    println!("Score: {}/{}", record.score, record.total);
    if !record.feedback.is_empty() {
        println!("{}", record.feedback);
    }
    finish(&mut session).await;
    Ok(())
}

fn read_answers_file(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read answers from {}", path.display()))?;
    Ok(text.lines().map(|line| line.trim().to_string()).collect())
}

fn prompt_answers(count: usize) -> Result<Vec<String>> {
    let stdin = io::stdin();
    let mut answers = Vec::with_capacity(count);
    for number in 1..=count {
        print!("Answer {number}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        answers.push(line.trim().to_string());
    }
    Ok(answers)
}

async fn open_session(ctx: &Context) -> Result<PortalSession> {
    let store = LibraryStore::open_async(ctx.library.clone())
        .await
        .with_context(|| format!("open library {}", ctx.library.display()))?;
    let mut session = Session::open(Arc::new(store), ctx.user.clone())
        .await?
        .with_autosave(ctx.settings.autosave.clone());
    if let Some(ai) = &ctx.ai {
        session = session.with_ai(Arc::clone(ai) as Arc<dyn AiService>);
    }
    Ok(session)
}

/// Await outstanding writes and warn about any that failed.
async fn finish(session: &mut PortalSession) {
    let report = session.settle().await;
    print_write_report(&report);
}
