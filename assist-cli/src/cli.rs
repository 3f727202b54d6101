//! CLI parser.

use assist_core::{Language, UserCategory};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "assist")]
#[command(about = "Personalized university assistant: ask, chat, inspect history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database (DATABASE_URL, default ./assist.db).
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Keep everything in memory for this run.
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Who is talking and in which session.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    #[arg(short, long, default_value = "guest")]
    pub user: String,

    #[arg(short, long, default_value = "student")]
    pub category: UserCategory,

    /// Continue an existing session instead of starting a new one.
    #[arg(short, long)]
    pub session: Option<String>,

    /// Visit token; makes the session a guest session.
    #[arg(long)]
    pub guest_token: Option<String>,

    /// Reply language hint (en or de).
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Knowledge passages as JSON lines (KNOWLEDGE_PATH).
    #[arg(long)]
    pub knowledge: Option<String>,

    /// Reply from templates only, without the completion service.
    #[arg(long)]
    pub no_llm: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle one message and print the reply.
    Ask {
        #[command(flatten)]
        session: SessionArgs,
        /// The message.
        text: String,
    },
    /// Interactive conversation on stdin; an empty line or `/quit` ends it.
    Chat {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// List the most recent sessions of a user, or the sessions of one guest visit.
    Sessions {
        #[arg(short, long, required_unless_present = "guest_token")]
        user: Option<String>,
        #[arg(long, conflicts_with = "user")]
        guest_token: Option<String>,
        #[arg(short, long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Past user messages similar to a text.
    Similar {
        #[arg(short, long)]
        user: String,
        #[arg(short, long, default_value = "5")]
        limit: usize,
        #[arg(long)]
        json: bool,
        text: String,
    },
    /// Cached statistics of a user.
    Stats {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        json: bool,
    },
}

/// `--database-url`, else DATABASE_URL, else `./assist.db`.
pub fn database_url(arg: Option<String>) -> String {
    arg.or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "./assist.db".to_string())
}
