// src/pipeline.rs
// =============================================================================
// Walker + Assembler glued together, shared by the CLI and the chat handler.
//
// The whole traversal runs before the first download: if any listing fails
// we stop without having fetched a single file.
// =============================================================================

use crate::assemble::{Assembler, Assembly};
use crate::config::Policy;
use crate::error::ScribeError;
use crate::github::{ContentFetcher, ContentLister};
use crate::repo::RepositoryRef;
use crate::walk::Walker;
use tracing::info;

/// Builds the artifact for one repository.
pub async fn scribe(
    lister: &dyn ContentLister,
    fetcher: &dyn ContentFetcher,
    policy: &Policy,
    repo: &RepositoryRef,
) -> Result<Assembly, ScribeError> {
    let files = Walker::new(lister, policy).collect(repo).await?;

    if files.is_empty() {
        return Err(ScribeError::NothingToDo {
            warnings: Vec::new(),
        });
    }

    info!(repository = %repo, files = files.len(), "Downloading eligible files");
    Assembler::new(fetcher).assemble(files).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::github::{DirectoryEntry, MockContentFetcher, MockContentLister};

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "demo").unwrap()
    }

    #[tokio::test]
    async fn test_listing_failure_fetches_nothing() {
        let mut lister = MockContentLister::new();
        lister.expect_list().returning(|_, path| match path {
            "" => Ok(vec![
                DirectoryEntry::file("a.py", "https://raw.example/a.py"),
                DirectoryEntry::dir("sub"),
            ]),
            _ => Err(ServiceError::Status {
                status: 403,
                message: "API rate limit exceeded".to_string(),
            }),
        });
        let mut fetcher = MockContentFetcher::new();
        fetcher.expect_fetch().times(0);

        let result = scribe(&lister, &fetcher, &Policy::default(), &repo()).await;

        assert!(matches!(result, Err(ScribeError::Listing { .. })));
    }

    #[tokio::test]
    async fn test_repository_without_code_is_nothing_to_do() {
        let mut lister = MockContentLister::new();
        lister.expect_list().returning(|_, _| {
            Ok(vec![DirectoryEntry::file("photo.jpg", "https://raw.example/photo.jpg")])
        });
        let fetcher = MockContentFetcher::new();

        let result = scribe(&lister, &fetcher, &Policy::default(), &repo()).await;

        assert!(matches!(result, Err(ScribeError::NothingToDo { .. })));
    }

    #[tokio::test]
    async fn test_end_to_end_with_mocks() {
        let mut lister = MockContentLister::new();
        lister.expect_list().returning(|_, path| match path {
            "" => Ok(vec![
                DirectoryEntry::dir("src"),
                DirectoryEntry::file("README.md", "https://raw.example/README.md"),
            ]),
            "src" => Ok(vec![DirectoryEntry::file(
                "src/main.py",
                "https://raw.example/src/main.py",
            )]),
            other => panic!("unexpected listing of {}", other),
        });
        let mut fetcher = MockContentFetcher::new();
        fetcher.expect_fetch().returning(|url| match url {
            "https://raw.example/src/main.py" => Ok(b"print(1)".to_vec()),
            "https://raw.example/README.md" => Ok(b"# hi".to_vec()),
            other => panic!("unexpected download of {}", other),
        });

        let assembly = scribe(&lister, &fetcher, &Policy::default(), &repo())
            .await
            .unwrap();

        assert_eq!(
            assembly.artifact.as_str(),
            "/src/main.py\nprint(1)\n\n/README.md\n# hi\n\n"
        );
    }
}
