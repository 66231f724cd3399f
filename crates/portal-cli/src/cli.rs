//! CLI argument definitions for the study portal.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use portal_cli::script::{parse_nav, parse_scope};
use portal_model::{
    CollegeId, DegreeLevel, Pattern, ResourceId, ResourceType, SubjectId, SubmissionId, UserId,
};
use portal_nav::{NavEvent, Scope};

#[derive(Parser)]
#[command(
    name = "portal",
    version,
    about = "Study Portal - browse and share past papers, notes and syllabi",
    long_about = "Browse the study resource library the way the portal does: pick a \
                  subject, pattern, degree, college and semester, then a resource type.\n\n\
                  Also covers saved resources, paper submissions, moderation and \
                  AI-generated self-assessments."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Act as this user (required for saved resources, submissions and admin work).
    #[arg(long = "user", value_name = "ID", global = true)]
    pub user: Option<UserId>,

    /// Settings file (default: settings.toml in the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Library file (overrides the settings file).
    #[arg(long = "library", value_name = "PATH", global = true)]
    pub library: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the library with reference subjects, colleges and starter accounts.
    Init,

    /// List the sections accepted by `navigate`.
    Sections,

    /// Walk the drill-down and print the resulting screen.
    Browse(BrowseArgs),

    /// Apply a navigation script, one event per line.
    Replay(ReplayArgs),

    /// List the current user's saved resources.
    Saved,

    /// Count a download and print the resource URL.
    Download {
        #[arg(value_name = "RESOURCE")]
        id: ResourceId,
    },

    /// Save or unsave a resource for the current user.
    Favorite {
        #[arg(value_name = "RESOURCE")]
        id: ResourceId,
    },

    /// Submit a paper for moderation.
    Submit(SubmitArgs),

    /// Moderation and library management (administrators only).
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Ask the study assistant a question.
    Ask {
        #[arg(value_name = "QUESTION", required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Take an AI-generated assessment.
    Quiz(QuizArgs),

    /// Show the current user's past assessments.
    History,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Top-level navigation, applied before the drill-down (SECTION or SECTION:TYPE).
    #[arg(long = "nav", value_name = "SECTION[:TYPE]", value_parser = parse_nav)]
    pub nav: Vec<NavEvent>,

    /// Subject id, or `all`.
    #[arg(long = "subject", value_parser = parse_scope::<SubjectId>)]
    pub subject: Option<Scope<SubjectId>>,

    /// Curriculum pattern (old/cbcs, new/nep).
    #[arg(long = "pattern")]
    pub pattern: Option<Pattern>,

    /// Degree level (ug, pg).
    #[arg(long = "degree")]
    pub degree: Option<DegreeLevel>,

    /// College id, or `all`.
    #[arg(long = "college", value_parser = parse_scope::<CollegeId>)]
    pub college: Option<Scope<CollegeId>>,

    #[arg(long = "semester")]
    pub semester: Option<u8>,

    /// Resource type (past-paper, note, syllabus).
    #[arg(long = "type")]
    pub resource_type: Option<ResourceType>,

    /// Narrow the list to one year.
    #[arg(long = "year")]
    pub year: Option<u16>,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Script file with one navigation event per line.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Print the screen after every step, not just the last.
    #[arg(long = "each")]
    pub each: bool,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[arg(long = "title")]
    pub title: String,

    #[arg(long = "subject")]
    pub subject: SubjectId,

    #[arg(long = "college")]
    pub college: CollegeId,

    #[arg(long = "pattern")]
    pub pattern: Pattern,

    #[arg(long = "degree")]
    pub degree: DegreeLevel,

    #[arg(long = "semester")]
    pub semester: u8,

    #[arg(long = "year")]
    pub year: u16,

    #[arg(long = "type")]
    pub resource_type: ResourceType,

    /// The paper to upload.
    #[arg(long = "file", value_name = "PATH")]
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List submissions waiting for review.
    Pending,

    /// Publish a submission and credit its submitter.
    Approve {
        #[arg(value_name = "SUBMISSION")]
        id: SubmissionId,
        #[arg(long = "note")]
        note: Option<String>,
    },

    /// Turn a submission down.
    Reject {
        #[arg(value_name = "SUBMISSION")]
        id: SubmissionId,
        #[arg(long = "note")]
        note: Option<String>,
    },

    /// Remove a submission record entirely.
    Purge {
        #[arg(value_name = "SUBMISSION")]
        id: SubmissionId,
    },

    /// Remove a resource from the library.
    Delete {
        #[arg(value_name = "RESOURCE")]
        id: ResourceId,
    },

    /// Point a resource at a new download URL.
    SetUrl {
        #[arg(value_name = "RESOURCE")]
        id: ResourceId,
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Add resources from a JSON array file.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct QuizArgs {
    #[arg(long = "subject")]
    pub subject: SubjectId,

    #[arg(long = "semester")]
    pub semester: u8,

    #[arg(long = "topic")]
    pub topic: String,

    /// Read answers from a file (one per line) instead of stdin.
    #[arg(long = "answers", value_name = "PATH")]
    pub answers: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
