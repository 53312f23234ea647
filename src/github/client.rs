// src/github/client.rs
// =============================================================================
// The real ContentLister / ContentFetcher, talking to GitHub over HTTPS.
//
// Endpoints:
// - Listing: GET {api_base}/repos/{owner}/{repo}/contents/{path}
// - Download: GET {download_url} (raw.githubusercontent.com for public repos)
//
// No token is sent, so unauthenticated rate limits apply. When GitHub says
// no (404, 403 rate limit, ...) we pass its status and "message" field up
// unchanged and let the caller decide what that means.
//
// Rust concepts:
// - #[async_trait]: lets a trait have async methods (used behind &dyn)
// - url::Url path segments: percent-encodes names instead of format!-ing
// =============================================================================

use super::contents::{ContentFetcher, ContentLister, DirectoryEntry};
use crate::config::GithubSettings;
use crate::error::{ScribeError, ServiceError};
use crate::repo::RepositoryRef;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

// Shape of GitHub's error bodies: {"message": "Not Found", "documentation_url": ...}
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// HTTP client for the GitHub contents API.
///
/// Cheap to clone (reqwest's Client is reference counted inside).
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
}

impl GitHubClient {
    pub fn new(settings: &GithubSettings) -> Result<Self, ScribeError> {
        let api_base = Url::parse(&settings.api_base).map_err(|e| {
            ScribeError::Config(format!("invalid API base '{}': {}", settings.api_base, e))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ScribeError::Config(format!(
                "invalid API base '{}'",
                settings.api_base
            )));
        }

        let http = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ScribeError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { http, api_base })
    }

    // Builds {api_base}/repos/{owner}/{repo}/contents/{path}, percent-encoding
    // every segment so odd file names cannot break the URL.
    fn contents_url(&self, repo: &RepositoryRef, path: &str) -> Result<Url, ServiceError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Decode(format!("cannot extend {}", self.api_base)))?
            .pop_if_empty()
            .extend(["repos", repo.owner(), repo.name(), "contents"])
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

#[async_trait]
impl ContentLister for GitHubClient {
    async fn list(
        &self,
        repo: &RepositoryRef,
        path: &str,
    ) -> Result<Vec<DirectoryEntry>, ServiceError> {
        let url = self.contents_url(repo, path)?;
        debug!(%url, "Listing directory");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are JSON too; fall back when they are not
            let message = response
                .json::<ApiMessage>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| "no message".to_string());
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<DirectoryEntry>>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ContentFetcher for GitHubClient {
    async fn fetch(&self, download_url: &str) -> Result<Vec<u8>, ServiceError> {
        debug!(url = download_url, "Downloading file");

        let response = self.http.get(download_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("no message").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(api_base: &str) -> GitHubClient {
        let settings = GithubSettings {
            api_base: api_base.to_string(),
            user_agent: "repo-scribe-test".to_string(),
            timeout_secs: 5,
        };
        GitHubClient::new(&settings).unwrap()
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "demo").unwrap()
    }

    #[test]
    fn test_contents_url_for_root_and_nested_paths() {
        let client = client_for("https://api.github.com");

        let root = client.contents_url(&repo(), "").unwrap();
        assert_eq!(root.as_str(), "https://api.github.com/repos/octo/demo/contents");

        let nested = client.contents_url(&repo(), "src/my dir").unwrap();
        assert_eq!(
            nested.as_str(),
            "https://api.github.com/repos/octo/demo/contents/src/my%20dir"
        );
    }

    #[test]
    fn test_rejects_unusable_api_base() {
        let settings = GithubSettings {
            api_base: "not a url".to_string(),
            ..GithubSettings::default()
        };
        assert!(matches!(
            GitHubClient::new(&settings),
            Err(ScribeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_list_parses_entries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/demo/contents/src")
            .match_header("user-agent", "repo-scribe-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"name": "lib.rs", "path": "src/lib.rs", "type": "file",
                     "download_url": "https://raw.example/src/lib.rs"}]"#,
            )
            .create_async()
            .await;

        let entries = client_for(&server.url())
            .list(&repo(), "src")
            .await
            .unwrap();

        assert_eq!(
            entries,
            vec![DirectoryEntry::file("src/lib.rs", "https://raw.example/src/lib.rs")]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_surfaces_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/demo/contents")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found", "documentation_url": "https://docs"}"#)
            .create_async()
            .await;

        let err = client_for(&server.url())
            .list(&repo(), "")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Status {
                status: 404,
                message: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_list_without_json_error_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/demo/contents")
            .with_status(403)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = client_for(&server.url())
            .list(&repo(), "")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Status {
                status: 403,
                message: "no message".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_raw_bytes() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/raw/main.py")
            .with_status(200)
            .with_body("print(1)")
            .create_async()
            .await;

        let url = format!("{}/raw/main.py", server.url());
        let bytes = client_for(&server.url()).fetch(&url).await.unwrap();

        assert_eq!(bytes, b"print(1)".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/raw/gone.py")
            .with_status(500)
            .create_async()
            .await;

        let url = format!("{}/raw/gone.py", server.url());
        let err = client_for(&server.url()).fetch(&url).await.unwrap_err();

        assert!(matches!(err, ServiceError::Status { status: 500, .. }));
    }
}
