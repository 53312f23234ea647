// src/github/contents.rs
// =============================================================================
// What the GitHub contents API gives us, and the two seams the rest of the
// program talks to:
//
// - ContentLister: "what is inside this directory?"
// - ContentFetcher: "give me the bytes behind this download URL"
//
// The walker and assembler only know these traits. GitHubClient is the real
// implementation; tests use the mockall-generated MockContentLister and
// MockContentFetcher instead of the network.
// =============================================================================

use crate::error::ServiceError;
use crate::repo::RepositoryRef;
use async_trait::async_trait;
use serde::Deserialize;

#[cfg(test)]
use mockall::automock;

/// Kind of entry in a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    /// symlink, submodule, or anything GitHub adds later
    #[serde(other)]
    Other,
}

/// One item of a GET /repos/{owner}/{repo}/contents/{path} response.
///
/// The API sends more fields (sha, size, urls); we only keep what the
/// traversal needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Present for files only
    #[serde(default)]
    pub download_url: Option<String>,
}

#[cfg(test)]
impl DirectoryEntry {
    pub fn file(path: &str, download_url: &str) -> Self {
        Self {
            name: file_name(path),
            path: path.to_string(),
            entry_type: EntryType::File,
            download_url: Some(download_url.to_string()),
        }
    }

    pub fn dir(path: &str) -> Self {
        Self {
            name: file_name(path),
            path: path.to_string(),
            entry_type: EntryType::Dir,
            download_url: None,
        }
    }
}

#[cfg(test)]
fn file_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Lists one directory of a repository. `path` is "" for the root.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentLister: Send + Sync {
    async fn list(
        &self,
        repo: &RepositoryRef,
        path: &str,
    ) -> Result<Vec<DirectoryEntry>, ServiceError>;
}

/// Downloads the raw bytes of one file.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, download_url: &str) -> Result<Vec<u8>, ServiceError>;
}
