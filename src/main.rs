// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and load the settings (once, passed down explicitly)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = delivered, 1 = nothing to deliver, 2 = error)
// =============================================================================

mod assemble;   // src/assemble.rs - downloads files, builds the artifact
mod chat;       // src/chat/ - chat message handling and reply delivery
mod cli;        // src/cli.rs - command-line parsing
mod config;     // src/config.rs - settings and classification policy
mod error;      // src/error.rs - error types
mod github;     // src/github/ - GitHub contents API client
mod logging;    // src/logging.rs - tracing subscriber setup
mod pipeline;   // src/pipeline.rs - walk + assemble
mod repo;       // src/repo.rs - owner/repo parsing
mod sink;       // src/sink.rs - file and attachment output
mod walk;       // src/walk/ - repository traversal

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Settings;
use error::{ContentWarning, ScribeError};
use github::GitHubClient;
use repo::RepositoryRef;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = artifact delivered
//   Ok(1) = nothing eligible to deliver
//   Err = invalid input, unreadable repository, I/O or config problem
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = Settings::load(cli.config.as_deref()).context("Could not load settings")?;

    match cli.command {
        Commands::Fetch {
            repo_url,
            output,
            json,
        } => {
            let output = output.unwrap_or_else(|| settings.output.file_name.clone());
            handle_fetch(&settings, repo_url, &output, json).await
        }
        Commands::Chat { outbox } => handle_chat(&settings, outbox).await,
    }
}

// JSON form of a fetch run, printed with --json
#[derive(Debug, Serialize)]
struct Report<'a> {
    repository: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    files: &'a [String],
    warnings: &'a [ContentWarning],
}

// Handles the 'fetch' subcommand
async fn handle_fetch(
    settings: &Settings,
    repo_url: Option<String>,
    output: &Path,
    json: bool,
) -> Result<i32> {
    let repo_url = match repo_url {
        Some(url) => url,
        None => prompt_for_url().await?,
    };

    // Rejected here, before any request goes out
    let repo = RepositoryRef::from_url(&repo_url)?;
    let client = GitHubClient::new(&settings.github)?;

    if !json {
        println!("🔍 Processing repository '{}'...", repo);
    }

    let assembly = match pipeline::scribe(&client, &client, &settings.policy, &repo).await {
        Ok(assembly) => assembly,
        Err(ScribeError::NothingToDo { warnings }) => {
            if json {
                print_report(&Report {
                    repository: repo.to_string(),
                    status: "empty",
                    output: None,
                    files: &[],
                    warnings: &warnings,
                })?;
            } else {
                print_warnings(&warnings);
                println!("⚠️  No eligible code files found in '{}'", repo);
            }
            return Ok(1);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Could not process repository '{}'", repo))
        }
    };

    sink::write_file(output, &assembly.artifact)
        .with_context(|| format!("Could not write {}", output.display()))?;

    if json {
        print_report(&Report {
            repository: repo.to_string(),
            status: "ok",
            output: Some(output.display().to_string()),
            files: assembly.artifact.files(),
            warnings: &assembly.warnings,
        })?;
    } else {
        for path in assembly.artifact.files() {
            println!("   📄 {}", path);
        }
        print_warnings(&assembly.warnings);
        println!();
        println!("📊 Summary:");
        println!("   ✅ Included: {}", assembly.artifact.files().len());
        println!("   ⚠️  Skipped: {}", assembly.warnings.len());
        println!("   💾 Saved to: {}", output.display());
    }

    Ok(0)
}

// Asks for a URL on stdin, like the interactive version of the tool.
// The prompt goes to stderr so a --json report on stdout stays parseable.
async fn prompt_for_url() -> Result<String> {
    read_repo_url(BufReader::new(tokio::io::stdin()), tokio::io::stderr()).await
}

async fn read_repo_url<R, W>(mut input: R, mut prompt_out: W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    prompt_out
        .write_all(b"Enter a public GitHub repository URL: ")
        .await?;
    prompt_out.flush().await?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .await
        .context("Could not read repository URL from stdin")?;

    Ok(line.trim().to_string())
}

// Handles the 'chat' subcommand
async fn handle_chat(settings: &Settings, outbox: PathBuf) -> Result<i32> {
    let client = GitHubClient::new(&settings.github)?;
    let handler = chat::ChatHandler::new(&client, &client, &settings.policy);
    let mut transport = chat::OutboxTransport::new(outbox, std::io::stdout());

    let handled = chat::run_session(&handler, &mut transport, BufReader::new(tokio::io::stdin()))
        .await
        .context("Chat session failed")?;

    tracing::info!(messages = handled, "Chat session ended");
    Ok(0)
}

fn print_warnings(warnings: &[ContentWarning]) {
    for warning in warnings {
        println!("   ⚠️  Skipped {}: {}", warning.path, warning.reason);
    }
}

fn print_report(report: &Report<'_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    println!("{}", json_output);
    Ok(())
}
