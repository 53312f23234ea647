// src/config.rs
// =============================================================================
// Runtime settings and the file classification policy.
//
// Everything here is built ONCE at startup and then handed around by
// reference. Nothing reads configuration from global state.
//
// Sources, lowest priority first:
// 1. Built-in defaults (the extension / ignore tables below)
// 2. A TOML file (--config PATH, or ./repo-scribe.toml when it exists)
// 3. REPO_SCRIBE_API_BASE environment variable
// =============================================================================

use crate::error::ScribeError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file picked up from the working directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "repo-scribe.toml";

/// Environment variable overriding the GitHub API base URL
pub const API_BASE_ENV: &str = "REPO_SCRIBE_API_BASE";

const DEFAULT_ALLOWED: &[&str] = &[
    ".py", ".js", ".java", ".c", ".cpp", ".h", ".hpp", ".cs", ".go", ".rs", ".php", ".html",
    ".css", ".scss", ".less", ".xml", ".json", ".yaml", ".yml", ".md", ".sh", ".bat", ".ps1",
    ".rb", ".ts", ".tsx", "Dockerfile", ".env", ".sql",
];

const DEFAULT_IGNORED_ITEMS: &[&str] = &[
    ".git",
    ".github",
    ".vscode",
    "node_modules",
    "dist",
    "build",
    "__pycache__",
    "package-lock.json",
    "yarn.lock",
];

const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".pdf", ".doc", ".docx", ".xls",
    ".xlsx", ".ppt", ".pptx", ".zip", ".tar", ".gz", ".rar", ".7z", ".exe", ".dll", ".so", ".o",
    ".a", ".lib", ".class", ".jar", ".war", ".ear", ".mp3", ".mp4", ".avi", ".mkv", ".mov",
    ".webm", ".woff", ".woff2", ".ttf", ".eot", ".otf",
];

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Decides which repository entries end up in the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Extensions (".rs") and exact file names ("Dockerfile") worth keeping
    pub allowed: HashSet<String>,
    /// Directory or file names skipped outright, subtree included
    pub ignored_items: HashSet<String>,
    /// Extensions that are never text, even if also listed in `allowed`
    pub ignored_extensions: HashSet<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed: to_set(DEFAULT_ALLOWED),
            ignored_items: to_set(DEFAULT_IGNORED_ITEMS),
            ignored_extensions: to_set(DEFAULT_IGNORED_EXTENSIONS),
        }
    }
}

impl Policy {
    /// True when a directory or file with this name must be skipped entirely.
    pub fn is_ignored_item(&self, name: &str) -> bool {
        self.ignored_items.contains(name)
    }

    /// True when a file with this name belongs in the artifact.
    ///
    /// A file is kept iff its extension or its whole name is allowed, its
    /// extension is not an ignored one, and its name is not an ignored item.
    pub fn is_includable(&self, name: &str) -> bool {
        if self.is_ignored_item(name) {
            return false;
        }

        let extension = extension_of(name);
        let extension = extension.as_deref();
        let allowed =
            self.allowed.contains(name) || extension.map_or(false, |ext| self.allowed.contains(ext));
        let ignored = extension.map_or(false, |ext| self.ignored_extensions.contains(ext));

        allowed && !ignored
    }
}

// Final ".suffix" of a file name, dot included. Dotfiles like ".env" have none.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    /// Base URL of the REST API (no trailing slash needed)
    pub api_base: String,
    /// GitHub rejects requests without a User-Agent header
    pub user_agent: String,
    /// Per-request timeout handed to the HTTP client
    pub timeout_secs: u64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            user_agent: format!("repo-scribe/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where `fetch` writes the artifact when --output is not given
    pub file_name: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from("file.txt"),
        }
    }
}

/// Everything the front ends need, loaded once in main.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub github: GithubSettings,
    pub output: OutputSettings,
    pub policy: Policy,
}

impl Settings {
    /// Loads settings from `path`, or from ./repo-scribe.toml when present,
    /// or falls back to the defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ScribeError> {
        Self::load_in(path, Path::new("."))
    }

    // Same as `load`, with the default file looked up in `workdir`
    fn load_in(path: Option<&Path>, workdir: &Path) -> Result<Self, ScribeError> {
        let default_file = workdir.join(DEFAULT_CONFIG_FILE);
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if default_file.exists() => Self::from_file(&default_file)?,
            None => Self::default(),
        };

        if let Ok(api_base) = std::env::var(API_BASE_ENV) {
            if !api_base.is_empty() {
                settings.github.api_base = api_base;
            }
        }

        debug!(
            api_base = %settings.github.api_base,
            allowed = settings.policy.allowed.len(),
            ignored_items = settings.policy.ignored_items.len(),
            ignored_extensions = settings.policy.ignored_extensions.len(),
            "Settings loaded"
        );

        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, ScribeError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ScribeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
            .map_err(|e| ScribeError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
