// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Two subcommands, one per front end:
// - fetch: bundle one repository into a file on disk
// - chat: answer repository links typed one per line, like a chat bot
//
// Rust concepts:
// - Option<T>: a missing URL means "ask for it on stdin"
// - ArgAction::Count: -v, -vv turn into a number
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "repo-scribe",
    version,
    about = "Bundle all source files of a public GitHub repository into one text file",
    long_about = "repo-scribe walks a public GitHub repository through the contents API, keeps the \
                  files that look like code, and concatenates them with '/path' headers into a \
                  single text file that is easy to paste into other tools."
)]
pub struct Cli {
    /// Increase log verbosity (-v = info, -vv = debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML config file (default: ./repo-scribe.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a repository's code into a single text file
    ///
    /// Example: repo-scribe fetch https://github.com/rust-lang/log
    Fetch {
        /// GitHub repository URL (e.g., https://github.com/user/repo).
        /// Prompted for on stdin when omitted.
        repo_url: Option<String>,

        /// Where to write the artifact (default from config: file.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a JSON report instead of the human summary
        #[arg(long)]
        json: bool,
    },

    /// Run a line-based chat session: each stdin line is one message
    ///
    /// Example: echo "https://github.com/rust-lang/log" | repo-scribe chat
    Chat {
        /// Directory where document replies are stored
        #[arg(long, default_value = "outbox")]
        outbox: PathBuf,
    },
}
