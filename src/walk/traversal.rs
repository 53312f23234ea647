// src/walk/traversal.rs
// =============================================================================
// Depth-first repository traversal with an explicit worklist.
//
// How it works:
// 1. List the root directory and push its entries onto the stack
// 2. Take the next entry from the deepest listing on the stack
// 3. Ignored name? Skip it (a skipped directory is never listed)
// 4. Directory? List it and push its entries on top, so we finish it
//    before coming back to its siblings
// 5. Includable file? Hand it out as a FileDescriptor
// 6. A listing exhausted? Pop it and continue with the parent
//
// Entries come out in exactly the order the API lists them, depth-first.
// A failed listing empties the stack: the traversal reports the error once
// and then ends. There is no resuming; start a new traversal instead.
// =============================================================================

use crate::config::Policy;
use crate::error::ScribeError;
use crate::github::{ContentLister, DirectoryEntry, EntryType};
use crate::repo::RepositoryRef;
use futures::stream::{Stream, TryStreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A file the assembler should download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub path: String,
    pub download_url: String,
}

/// Walks repositories with one listing service and one policy.
pub struct Walker<'a> {
    lister: &'a dyn ContentLister,
    policy: &'a Policy,
}

impl<'a> Walker<'a> {
    pub fn new(lister: &'a dyn ContentLister, policy: &'a Policy) -> Self {
        Self { lister, policy }
    }

    /// Starts a lazy traversal. Nothing is requested until the first `next()`.
    pub fn traverse(&self, repo: &RepositoryRef) -> Traversal<'a> {
        Traversal {
            lister: self.lister,
            policy: self.policy,
            repo: repo.clone(),
            stack: Vec::new(),
            started: false,
        }
    }

    /// Runs a whole traversal. The first listing failure aborts it; no
    /// partial list is ever returned.
    pub async fn collect(&self, repo: &RepositoryRef) -> Result<Vec<FileDescriptor>, ScribeError> {
        // try_collect stops at the first Err and drops what came before it
        let files: Vec<FileDescriptor> = self.traverse(repo).into_stream().try_collect().await?;

        info!(repository = %repo, files = files.len(), "Traversal finished");
        Ok(files)
    }
}

/// One in-progress walk over a repository.
pub struct Traversal<'a> {
    lister: &'a dyn ContentLister,
    policy: &'a Policy,
    repo: RepositoryRef,
    // Listings not yet fully consumed; the last one is the deepest directory
    stack: Vec<std::vec::IntoIter<DirectoryEntry>>,
    started: bool,
}

impl<'a> Traversal<'a> {
    /// Next includable file, a listing error, or None when the walk is over.
    pub async fn next(&mut self) -> Option<Result<FileDescriptor, ScribeError>> {
        if !self.started {
            self.started = true;
            if let Err(e) = self.descend("").await {
                return Some(Err(e));
            }
        }

        loop {
            let listing = self.stack.last_mut()?;
            let entry = match listing.next() {
                Some(entry) => entry,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            if self.policy.is_ignored_item(&entry.name) {
                debug!(path = %entry.path, "Skipping ignored item");
                continue;
            }

            match entry.entry_type {
                EntryType::Dir => {
                    if let Err(e) = self.descend(&entry.path).await {
                        return Some(Err(e));
                    }
                }
                EntryType::File => {
                    if !self.policy.is_includable(&entry.name) {
                        continue;
                    }
                    match entry.download_url {
                        Some(download_url) => {
                            return Some(Ok(FileDescriptor {
                                path: entry.path,
                                download_url,
                            }));
                        }
                        None => warn!(path = %entry.path, "File has no download URL, skipping"),
                    }
                }
                EntryType::Other => {
                    debug!(path = %entry.path, "Skipping entry that is neither file nor directory");
                }
            }
        }
    }

    /// Turns the traversal into a `futures::Stream` of the same items.
    pub fn into_stream(self) -> impl Stream<Item = Result<FileDescriptor, ScribeError>> + 'a {
        futures::stream::unfold(self, |mut traversal| async move {
            let item = traversal.next().await?;
            Some((item, traversal))
        })
    }

    async fn descend(&mut self, path: &str) -> Result<(), ScribeError> {
        match self.lister.list(&self.repo, path).await {
            Ok(entries) => {
                debug!(path, entries = entries.len(), "Listed directory");
                self.stack.push(entries.into_iter());
                Ok(())
            }
            Err(source) => {
                self.stack.clear();
                Err(ScribeError::Listing {
                    path: if path.is_empty() { "/".to_string() } else { path.to_string() },
                    source,
                })
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Vec of iterators instead of recursion?
//    - An async fn cannot call itself without boxing the future
//    - The stack also makes the walk lazy: next() does just enough work
//      to produce one file
//
// 2. What does futures::stream::unfold do?
//    - It turns "state + async step function" into a Stream
//    - Here the state is the Traversal itself, and the step is next()
//    - try_collect() then stops at the first Err, so nothing is listed
//      after a failure
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::github::MockContentLister;
    use futures::StreamExt;
    use std::collections::HashMap;

    fn raw(path: &str) -> String {
        format!("https://raw.example/{}", path)
    }

    fn file(path: &str) -> DirectoryEntry {
        DirectoryEntry::file(path, &raw(path))
    }

    // A lister backed by a fixed tree; unknown paths answer 404
    fn tree_lister(tree: Vec<(&str, Vec<DirectoryEntry>)>) -> MockContentLister {
        let tree: HashMap<String, Vec<DirectoryEntry>> = tree
            .into_iter()
            .map(|(path, entries)| (path.to_string(), entries))
            .collect();

        let mut lister = MockContentLister::new();
        lister.expect_list().returning(move |_, path| {
            tree.get(path).cloned().ok_or(ServiceError::Status {
                status: 404,
                message: "Not Found".to_string(),
            })
        });
        lister
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "demo").unwrap()
    }

    fn paths(files: &[FileDescriptor]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[tokio::test]
    async fn test_depth_first_in_listing_order() {
        let lister = tree_lister(vec![
            ("", vec![DirectoryEntry::dir("a"), file("c.py")]),
            ("a", vec![file("a/x.py"), DirectoryEntry::dir("a/b")]),
            ("a/b", vec![file("a/b/y.py")]),
        ]);
        let policy = Policy::default();

        let files = Walker::new(&lister, &policy).collect(&repo()).await.unwrap();

        assert_eq!(paths(&files), vec!["a/x.py", "a/b/y.py", "c.py"]);
        assert_eq!(files[0].download_url, raw("a/x.py"));
    }

    #[tokio::test]
    async fn test_ignored_subtrees_are_never_listed() {
        // Listing node_modules or .git would hit a 404 and fail the walk
        let lister = tree_lister(vec![
            (
                "",
                vec![
                    DirectoryEntry::dir("node_modules"),
                    DirectoryEntry::dir("src"),
                    DirectoryEntry::dir(".git"),
                ],
            ),
            (
                "src",
                vec![DirectoryEntry::dir("src/__pycache__"), file("src/app.js")],
            ),
        ]);
        let policy = Policy::default();

        let files = Walker::new(&lister, &policy).collect(&repo()).await.unwrap();

        assert_eq!(paths(&files), vec!["src/app.js"]);
    }

    #[tokio::test]
    async fn test_classification_applied_to_files() {
        let lister = tree_lister(vec![(
            "",
            vec![
                file("Dockerfile"),
                file("logo.png"),
                file("notes.txt"),
                file("yarn.lock"),
                file("main.go"),
            ],
        )]);
        let mut policy = Policy::default();
        policy.allowed.insert(".png".to_string());

        let files = Walker::new(&lister, &policy).collect(&repo()).await.unwrap();

        assert_eq!(paths(&files), vec!["Dockerfile", "main.go"]);
    }

    #[tokio::test]
    async fn test_skips_files_without_locator_and_other_entries() {
        let mut no_locator = file("lost.py");
        no_locator.download_url = None;
        let submodule = DirectoryEntry {
            name: "vendor".to_string(),
            path: "vendor".to_string(),
            entry_type: EntryType::Other,
            download_url: None,
        };
        let lister = tree_lister(vec![("", vec![no_locator, submodule, file("kept.py")])]);
        let policy = Policy::default();

        let files = Walker::new(&lister, &policy).collect(&repo()).await.unwrap();

        assert_eq!(paths(&files), vec!["kept.py"]);
    }

    #[tokio::test]
    async fn test_deep_listing_failure_aborts_everything() {
        // "a/b" is missing from the tree, so listing it fails after a/x.py was found
        let lister = tree_lister(vec![
            ("", vec![DirectoryEntry::dir("a"), file("c.py")]),
            ("a", vec![file("a/x.py"), DirectoryEntry::dir("a/b")]),
        ]);
        let policy = Policy::default();

        let err = Walker::new(&lister, &policy)
            .collect(&repo())
            .await
            .unwrap_err();

        match err {
            ScribeError::Listing { path, source } => {
                assert_eq!(path, "a/b");
                assert!(matches!(source, ServiceError::Status { status: 404, .. }));
            }
            other => panic!("expected a listing error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_root_failure_reports_root_path() {
        let mut lister = MockContentLister::new();
        lister
            .expect_list()
            .times(1)
            .returning(|_, _| Err(ServiceError::Transport("connection refused".to_string())));
        let policy = Policy::default();

        let err = Walker::new(&lister, &policy)
            .collect(&repo())
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Listing { ref path, .. } if path == "/"));
    }

    #[tokio::test]
    async fn test_stream_ends_after_error() {
        let lister = tree_lister(vec![(
            "",
            vec![file("first.py"), DirectoryEntry::dir("broken"), file("never.py")],
        )]);
        let policy = Policy::default();
        let walker = Walker::new(&lister, &policy);

        let items: Vec<_> = walker.traverse(&repo()).into_stream().collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().path, "first.py");
        assert!(matches!(items[1], Err(ScribeError::Listing { .. })));
    }

    #[tokio::test]
    async fn test_collect_stops_listing_after_first_failure() {
        let mut lister = MockContentLister::new();
        lister.expect_list().times(2).returning(|_, path| match path {
            "" => Ok(vec![
                DirectoryEntry::dir("broken"),
                DirectoryEntry::dir("later"),
            ]),
            _ => Err(ServiceError::Status {
                status: 500,
                message: "Server Error".to_string(),
            }),
        });
        let policy = Policy::default();

        let err = Walker::new(&lister, &policy)
            .collect(&repo())
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Listing { ref path, .. } if path == "broken"));
    }

    #[tokio::test]
    async fn test_traversal_is_lazy() {
        let mut lister = MockContentLister::new();
        lister.expect_list().times(0);
        let policy = Policy::default();

        let _traversal = Walker::new(&lister, &policy).traverse(&repo());
    }
}
