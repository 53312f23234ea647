// src/assemble.rs
// =============================================================================
// This module turns a list of files into the final text artifact.
//
// For each file, in the order we got them:
//   pending -> fetched -> decoded -> appended
//                      \-> not UTF-8 -> skipped (warning)
//          \-> download failed       -> skipped (warning)
//
// Output layout, per file:
//   /path/to/file
//   <file content>
//   <blank line>
//
// A skipped file never stops the run. If NOTHING could be appended we
// report that instead of producing an empty artifact.
// =============================================================================

use crate::error::{ContentWarning, ScribeError};
use crate::github::ContentFetcher;
use crate::walk::FileDescriptor;
use tracing::{debug, info, warn};

/// The concatenated repository text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    text: String,
    files: Vec<String>,
}

impl Artifact {
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Paths that made it into the artifact, in output order
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

/// A successful assembly: the artifact plus every file that was left out.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub artifact: Artifact,
    pub warnings: Vec<ContentWarning>,
}

pub struct Assembler<'a> {
    fetcher: &'a dyn ContentFetcher,
}

impl<'a> Assembler<'a> {
    pub fn new(fetcher: &'a dyn ContentFetcher) -> Self {
        Self { fetcher }
    }

    // Downloads and concatenates every descriptor, one at a time.
    //
    // Returns: Assembly on success, or NothingToDo (carrying the warnings)
    // when not a single file could be used.
    pub async fn assemble<I>(&self, descriptors: I) -> Result<Assembly, ScribeError>
    where
        I: IntoIterator<Item = FileDescriptor>,
    {
        // One growing buffer for the whole artifact
        let mut text = String::new();
        let mut files = Vec::new();
        let mut warnings = Vec::new();

        for descriptor in descriptors {
            debug!(path = %descriptor.path, "Processing file");

            let bytes = match self.fetcher.fetch(&descriptor.download_url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %descriptor.path, error = %e, "Could not download file, skipping");
                    warnings.push(ContentWarning {
                        path: descriptor.path,
                        reason: format!("download failed: {}", e),
                    });
                    continue;
                }
            };

            let content = match String::from_utf8(bytes) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %descriptor.path, error = %e, "File is not valid UTF-8, skipping");
                    warnings.push(ContentWarning {
                        path: descriptor.path,
                        reason: "not valid UTF-8".to_string(),
                    });
                    continue;
                }
            };

            append_file(&mut text, &descriptor.path, &content);
            files.push(descriptor.path);
        }

        if files.is_empty() {
            return Err(ScribeError::NothingToDo { warnings });
        }

        info!(
            files = files.len(),
            skipped = warnings.len(),
            bytes = text.len(),
            "Artifact assembled"
        );

        Ok(Assembly {
            artifact: Artifact { text, files },
            warnings,
        })
    }
}

fn append_file(buffer: &mut String, path: &str, content: &str) {
    buffer.push('/');
    buffer.push_str(path);
    buffer.push('\n');
    buffer.push_str(content);
    buffer.push('\n');
    buffer.push('\n');
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why String::from_utf8 instead of response.text()?
//    - text() silently replaces invalid bytes with U+FFFD
//    - from_utf8 fails instead, which tells us the file is probably binary
//    - A binary file with a ".json" name should be skipped, not garbled
//
// 2. Why push_str on one String instead of format! per file?
//    - format! allocates a new String every time
//    - push_str grows one buffer in place (amortized O(1) per byte)
//
// 3. What is IntoIterator<Item = FileDescriptor>?
//    - Accepts a Vec, an iterator, anything that yields descriptors
//    - We take ownership so paths can move into the result without cloning
// -----------------------------------------------------------------------------
