// src/chat/handler.rs
// =============================================================================
// Turns one incoming chat message into the replies we send back.
//
// Message flow:
// 1. "/start" or "/help" -> usage text
// 2. No repository in the text -> error text (no network call made)
// 3. Otherwise -> "processing" text, then either the artifact as a document
//    or a text explaining why there is none
//
// "Could not read the repository" and "nothing to send" are kept apart:
// the first is a failed listing, the second is a successful walk that
// found no usable files.
// =============================================================================

use crate::config::Policy;
use crate::error::ScribeError;
use crate::github::{ContentFetcher, ContentLister};
use crate::pipeline;
use crate::repo::RepositoryRef;
use crate::sink::Attachment;
use tracing::{info, warn};

pub const HELP_TEXT: &str = "👋 Send me a public GitHub repository link \
(https://github.com/owner/repo) and I will reply with all of its code in one text file.";

/// Something the bot says back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Document {
        attachment: Attachment,
        caption: String,
    },
}

pub struct ChatHandler<'a> {
    lister: &'a dyn ContentLister,
    fetcher: &'a dyn ContentFetcher,
    policy: &'a Policy,
}

impl<'a> ChatHandler<'a> {
    pub fn new(
        lister: &'a dyn ContentLister,
        fetcher: &'a dyn ContentFetcher,
        policy: &'a Policy,
    ) -> Self {
        Self {
            lister,
            fetcher,
            policy,
        }
    }

    pub async fn handle(&self, text: &str) -> Vec<Reply> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if matches!(text, "/start" | "/help") {
            return vec![Reply::Text(HELP_TEXT.to_string())];
        }

        let repo = match RepositoryRef::from_message(text) {
            Ok(repo) => repo,
            Err(e) => {
                info!(error = %e, "Message without a repository");
                return vec![Reply::Text(invalid_repository_reply(&e))];
            }
        };

        let mut replies = vec![Reply::Text(format!("⏳ Processing repository '{}'...", repo))];

        let outcome = pipeline::scribe(self.lister, self.fetcher, self.policy, &repo).await;
        replies.push(match outcome {
            Ok(assembly) => {
                let mut caption = format!(
                    "✅ {} file(s) from {}",
                    assembly.artifact.files().len(),
                    repo
                );
                if !assembly.warnings.is_empty() {
                    caption.push_str(&format!(", {} skipped", assembly.warnings.len()));
                }
                Reply::Document {
                    attachment: Attachment::from_artifact(
                        Attachment::default_name(&repo),
                        &assembly.artifact,
                    ),
                    caption,
                }
            }
            Err(ScribeError::NothingToDo { .. }) => Reply::Text(format!(
                "⚠️ No eligible code files found in '{}'.",
                repo
            )),
            Err(e @ ScribeError::Listing { .. }) => {
                warn!(repository = %repo, error = %e, "Repository could not be read");
                Reply::Text(format!("❌ Could not read repository '{}': {}", repo, e))
            }
            Err(e) => {
                warn!(repository = %repo, error = %e, "Chat request failed");
                Reply::Text(format!("❌ Something went wrong: {}", e))
            }
        });

        replies
    }
}

// The error text already tells the user what a valid link looks like
fn invalid_repository_reply(error: &ScribeError) -> String {
    format!("❌ {}", error)
}
