//! assist CLI: ask one question, chat interactively, list sessions, look up similar messages
//! and user stats. Config from env and optional CLI args.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use assist_cli::{build_assistant, database_url, open_stores, Cli, Commands, SessionArgs, Stores};
use assist_core::{init_tracing, MessageStore, Session, UserStatsStore};
use clap::Parser;
use context_strategies::{ContextRequest, ContextStrategy, SimilarityRetriever, StrategyResult};
use pipeline::{Assistant, TurnOutcome, TurnRequest};
use tokio::io::{AsyncBufReadExt, BufReader};

const PREVIEW_LEN: usize = 80;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let log_file = std::env::var("LOG_FILE").ok().filter(|p| !p.trim().is_empty());
    init_tracing(log_file.as_deref().map(Path::new))?;

    let cli = Cli::parse();
    let stores = open_stores(&database_url(cli.database_url), cli.memory).await?;

    match cli.command {
        Commands::Ask { session, text } => handle_ask(&stores, &session, &text).await,
        Commands::Chat { session } => handle_chat(&stores, &session).await,
        Commands::Sessions {
            user,
            guest_token,
            limit,
            json,
        } => handle_sessions(&stores, user, guest_token, limit, json).await,
        Commands::Similar {
            user,
            limit,
            json,
            text,
        } => handle_similar(&stores, &user, limit, &text, json).await,
        Commands::Stats { user, json } => handle_stats(&stores, &user, json).await,
    }
}

/// Reuses `--session` when given, otherwise starts a new session.
async fn open_session(
    stores: &Stores,
    assistant: &Assistant,
    args: &SessionArgs,
) -> Result<Session> {
    if let Some(id) = &args.session {
        return stores
            .messages
            .get_session(id)
            .await?
            .with_context(|| format!("Session {} not found", id));
    }
    let session = assistant
        .start_session(&args.user, args.category, args.guest_token.as_deref())
        .await?;
    println!("Session: {}", session.id);
    Ok(session)
}

fn request(session: &Session, args: &SessionArgs, text: &str) -> TurnRequest {
    let mut request = TurnRequest::new(&session.id, &args.user, text);
    if let Some(token) = &args.guest_token {
        request = request.with_isolation_token(token);
    }
    if let Some(language) = args.language {
        request = request.with_language_hint(language);
    }
    request
}

fn print_outcome(outcome: &TurnOutcome) {
    let turn = &outcome.turn;
    println!("\n{}\n", outcome.reply);
    for button in &turn.interactive.buttons {
        println!("  [{}] -> {}", button.text, button.payload());
    }
    if !turn.suggested_queries.is_empty() {
        println!("Suggestions: {}", turn.suggested_queries.join(" | "));
    }
    println!(
        "({} / {} {:.2} / {} / lead {}{})",
        turn.topic,
        turn.classification.intent,
        turn.classification.confidence,
        turn.classification.sentiment,
        turn.classification.lead_score,
        if turn.requires_followup { " / follow-up" } else { "" }
    );
}

async fn handle_ask(stores: &Stores, args: &SessionArgs, text: &str) -> Result<()> {
    let assistant = build_assistant(stores, args).await?;
    let session = open_session(stores, &assistant, args).await?;
    match assistant.handle_turn(request(&session, args, text)).await {
        Ok(outcome) => print_outcome(&outcome),
        Err(e) => {
            tracing::error!(error = %e, "Turn failed");
            println!("{}", e.user_message());
        }
    }
    Ok(())
}

async fn handle_chat(stores: &Stores, args: &SessionArgs) -> Result<()> {
    let assistant = build_assistant(stores, args).await?;
    let session = open_session(stores, &assistant, args).await?;
    println!("Type a message; an empty line or /quit ends the chat.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() || text == "/quit" {
            break;
        }
        match assistant.handle_turn(request(&session, args, text)).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => {
                tracing::error!(error = %e, "Turn failed");
                println!("{}", e.user_message());
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn handle_sessions(
    stores: &Stores,
    user: Option<String>,
    guest_token: Option<String>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let (owner, sessions, total) = match (guest_token, user) {
        (Some(token), _) => {
            let mut sessions = stores.messages.guest_sessions(&token).await?;
            let total = sessions.len();
            sessions.truncate(limit);
            (format!("guest visit {}", token), sessions, total)
        }
        (None, Some(user)) => {
            let sessions = stores.messages.recent_sessions(&user, limit).await?;
            let total = stores.messages.count_sessions(&user).await?;
            (user, sessions, total)
        }
        (None, None) => anyhow::bail!("--user or --guest-token is required"),
    };
    if json {
        return print_json(&sessions);
    }
    if sessions.is_empty() {
        println!("No sessions for {}.", owner);
        return Ok(());
    }
    println!("Recent {} of {} session(s) for {}:\n", sessions.len(), total, owner);
    println!("{:<36} {:<20} {:<9} {}", "id", "created_at", "category", "title");
    println!("{}", "-".repeat(100));
    for s in &sessions {
        println!(
            "{:<36} {:<20} {:<9} {}",
            s.id,
            s.created_at.format("%Y-%m-%d %H:%M:%S"),
            s.category,
            s.title.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn handle_similar(
    stores: &Stores,
    user: &str,
    limit: usize,
    text: &str,
    json: bool,
) -> Result<()> {
    let retriever = SimilarityRetriever::new(Arc::clone(&stores.messages)).with_limit(limit);
    let request = ContextRequest {
        user_id: user,
        session_id: None,
        text,
        language: Default::default(),
        category: None,
    };
    let matches = match retriever.build_context(&request).await? {
        StrategyResult::Similar(matches) => matches,
        _ => Vec::new(),
    };
    if json {
        return print_json(&matches);
    }
    if matches.is_empty() {
        println!("No similar messages for {}.", user);
        return Ok(());
    }
    for m in &matches {
        let preview =
            assist_core::truncate_chars(&m.message.content, PREVIEW_LEN).replace('\n', " ");
        println!(
            "{:>4.0}%  {}  {}  {}",
            m.score * 100.0,
            m.message.timestamp.format("%Y-%m-%d %H:%M"),
            m.message.session_id,
            preview
        );
    }
    Ok(())
}

async fn handle_stats(stores: &Stores, user: &str, json: bool) -> Result<()> {
    let stats = stores.stats.user_stats(user).await?;
    if json {
        return print_json(&stats);
    }
    let Some(stats) = stats else {
        println!("No stats for {}.", user);
        return Ok(());
    };
    println!("User: {} ({})", stats.user_id, stats.category);
    println!("Messages: {}", stats.total_messages);
    println!(
        "Most common intent: {}",
        stats.most_common_intent().unwrap_or("-")
    );
    let sentiments: Vec<&str> = stats
        .recent_sentiment_tail(5)
        .iter()
        .map(|s| s.as_str())
        .collect();
    println!("Recent sentiment: {}", sentiments.join(", "));
    if let Some(avg) = stats.average_lead_score() {
        println!("Average lead score: {:.1}", avg);
    }
    println!("Last seen: {}", stats.updated_at.format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}
