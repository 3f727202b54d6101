use std::env;

use assist_core::{Language, UserCategory};
use clap::Parser;
use serial_test::serial;

use crate::cli::{database_url, Cli, Commands};

#[test]
fn test_parse_ask_with_session_flags() {
    let cli = Cli::try_parse_from([
        "assist",
        "--memory",
        "ask",
        "--user",
        "alice",
        "--category",
        "employee",
        "--language",
        "de",
        "--no-llm",
        "Mein VPN geht nicht",
    ])
    .expect("parse");

    assert!(cli.memory);
    match cli.command {
        Commands::Ask { session, text } => {
            assert_eq!(session.user, "alice");
            assert_eq!(session.category, UserCategory::Employee);
            assert_eq!(session.language, Some(Language::De));
            assert!(session.no_llm);
            assert!(session.session.is_none());
            assert_eq!(text, "Mein VPN geht nicht");
        }
        _ => panic!("expected ask"),
    }
}

#[test]
fn test_parse_defaults_to_guest_student() {
    let cli = Cli::try_parse_from(["assist", "chat"]).expect("parse");
    match cli.command {
        Commands::Chat { session } => {
            assert_eq!(session.user, "guest");
            assert_eq!(session.category, UserCategory::Student);
        }
        _ => panic!("expected chat"),
    }
}

#[test]
fn test_parse_rejects_unknown_category() {
    assert!(Cli::try_parse_from(["assist", "ask", "--category", "alien", "hi"]).is_err());
}

#[test]
#[serial]
fn test_database_url_precedence() {
    env::remove_var("DATABASE_URL");
    assert_eq!(database_url(None), "./assist.db");

    env::set_var("DATABASE_URL", "/var/lib/assist/assist.db");
    assert_eq!(database_url(None), "/var/lib/assist/assist.db");
    assert_eq!(database_url(Some("other.db".to_string())), "other.db");
    env::remove_var("DATABASE_URL");
}

#[test]
fn test_parse_sessions_requires_user_or_guest_token() {
    assert!(Cli::try_parse_from(["assist", "sessions"]).is_err());
    assert!(
        Cli::try_parse_from(["assist", "sessions", "--user", "a", "--guest-token", "v"]).is_err()
    );

    let cli = Cli::try_parse_from(["assist", "sessions", "--guest-token", "visit-1", "--json"])
        .expect("parse");
    match cli.command {
        Commands::Sessions {
            user,
            guest_token,
            json,
            ..
        } => {
            assert!(user.is_none());
            assert_eq!(guest_token.as_deref(), Some("visit-1"));
            assert!(json);
        }
        _ => panic!("expected sessions"),
    }
}
