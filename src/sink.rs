// src/sink.rs
// =============================================================================
// Where a finished artifact goes.
//
// - write_file: the CLI saves it to disk
// - Attachment: the chat handler sends it as an in-memory document
// =============================================================================

use crate::assemble::Artifact;
use crate::repo::RepositoryRef;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// Writes the artifact to `path`, creating missing parent directories.
pub fn write_file(path: &Path, artifact: &Artifact) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, artifact.as_bytes())?;
    info!(path = %path.display(), bytes = artifact.as_bytes().len(), "Artifact written");
    Ok(())
}

/// A named, in-memory file ready to hand to a chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn from_artifact(file_name: impl Into<String>, artifact: &Artifact) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: artifact.as_bytes().to_vec(),
        }
    }

    /// "owner_repo.txt"
    pub fn default_name(repo: &RepositoryRef) -> String {
        format!("{}_{}.txt", repo.owner(), repo.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::Assembler;
    use crate::github::MockContentFetcher;
    use crate::walk::FileDescriptor;

    async fn sample_artifact() -> Artifact {
        let mut fetcher = MockContentFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(b"fn main() {}".to_vec()));
        let descriptor = FileDescriptor {
            path: "main.rs".to_string(),
            download_url: "https://raw.example/main.rs".to_string(),
        };

        Assembler::new(&fetcher)
            .assemble(vec![descriptor])
            .await
            .unwrap()
            .artifact
    }

    #[tokio::test]
    async fn test_write_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/file.txt");
        let artifact = sample_artifact().await;

        write_file(&path, &artifact).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "/main.rs\nfn main() {}\n\n");
    }

    #[tokio::test]
    async fn test_attachment_carries_artifact_bytes() {
        let artifact = sample_artifact().await;
        let repo = RepositoryRef::new("octo", "demo").unwrap();

        let attachment = Attachment::from_artifact(Attachment::default_name(&repo), &artifact);

        assert_eq!(attachment.file_name, "octo_demo.txt");
        assert_eq!(attachment.bytes, artifact.as_bytes());
    }
}
