// src/repo.rs
// =============================================================================
// Identifies which GitHub repository we are working on.
//
// Two ways to get one:
// - from a URL typed on the command line (https://github.com/owner/repo)
// - from free-form chat text, where the URL (or a bare owner/repo) can sit
//   anywhere in the message
//
// Parsing happens before any network call, so a bad reference never costs
// a request.
// =============================================================================

use crate::error::ScribeError;
use std::fmt;
use url::Url;

/// Owner + repository name, both non-empty and free of '/'.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    pub fn new(owner: &str, name: &str) -> Result<Self, ScribeError> {
        let name = name.strip_suffix(".git").unwrap_or(name);

        for part in [owner, name] {
            // "." and ".." would be folded away by URL path normalization
            if part.is_empty()
                || part == "."
                || part == ".."
                || part.contains('/')
                || part.contains('\\')
            {
                return Err(ScribeError::InvalidRepository(format!(
                    "'{}/{}' is not an owner/repository pair",
                    owner, name
                )));
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Parses a GitHub URL to extract owner and repository name
    //
    // Supported formats:
    //   - https://github.com/owner/repo
    //   - https://github.com/owner/repo.git
    //   - https://github.com/owner/repo/tree/main/src (extra segments ignored)
    //   - github.com/owner/repo
    //   - www.github.com/owner/repo
    pub fn from_url(input: &str) -> Result<Self, ScribeError> {
        let input = input.trim();
        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };

        let url = Url::parse(&with_scheme).map_err(|e| {
            ScribeError::InvalidRepository(format!("'{}' is not a URL: {}", input, e))
        })?;

        match url.host_str() {
            Some("github.com") | Some("www.github.com") => {}
            _ => {
                return Err(ScribeError::InvalidRepository(format!(
                    "not a GitHub URL: {}",
                    input
                )))
            }
        }

        let mut segments = url
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty());

        match (segments.next(), segments.next()) {
            (Some(owner), Some(name)) => Self::new(owner, name),
            _ => Err(ScribeError::InvalidRepository(format!(
                "expected https://github.com/owner/repo, got {}",
                input
            ))),
        }
    }

    /// Finds a repository anywhere in a chat message.
    ///
    /// A GitHub URL wins over a bare `owner/repo` token, wherever either sits.
    pub fn from_message(text: &str) -> Result<Self, ScribeError> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| matches!(c, '<' | '>' | '(' | ')' | ',' | '"' | '\'')))
            .collect();

        if let Some(found) = tokens
            .iter()
            .filter(|t| t.contains("github.com/"))
            .find_map(|t| Self::from_url(t).ok())
        {
            return Ok(found);
        }

        tokens
            .iter()
            .find_map(|t| {
                let (owner, name) = t.split_once('/')?;
                if !looks_like_owner(owner) || !looks_like_slug(name) {
                    return None;
                }
                // "3/4" or "1.2/3.4" in a sentence is not a repository
                if !t.chars().any(|c| c.is_ascii_alphabetic()) {
                    return None;
                }
                Self::new(owner, name).ok()
            })
            .ok_or_else(|| {
                ScribeError::InvalidRepository(
                    "send a link like https://github.com/owner/repo".to_string(),
                )
            })
    }
}

// GitHub owner and repository names: letters, digits, '-', '_' and '.'
fn looks_like_slug(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

// Owners are stricter: no leading '.' or '-'
fn looks_like_owner(s: &str) -> bool {
    looks_like_slug(s) && !s.starts_with('.') && !s.starts_with('-')
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Display vs to_string()
//    - Implementing fmt::Display gives us to_string() and "{}" for free
// -----------------------------------------------------------------------------
