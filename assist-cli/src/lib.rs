//! # assist-cli
//!
//! Command-line front end: argument parsing and wiring of stores, retrievers and the
//! completion client into an [`pipeline::Assistant`].

pub mod cli;
pub mod wiring;

pub use cli::{database_url, Cli, Commands, SessionArgs};
pub use wiring::{build_assistant, open_stores, Stores};

#[cfg(test)]
mod cli_test;
