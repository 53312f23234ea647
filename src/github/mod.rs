// src/github/mod.rs
// =============================================================================
// Everything that knows GitHub exists.
//
// - contents: listing entry types + the ContentLister / ContentFetcher traits
// - client: GitHubClient, the reqwest-backed implementation of both
//
// The walker and assembler depend on the traits only, so they can be tested
// without a network.
// =============================================================================

mod client;
mod contents;

pub use client::GitHubClient;
pub use contents::{ContentFetcher, ContentLister, DirectoryEntry, EntryType};

#[cfg(test)]
pub use contents::{MockContentFetcher, MockContentLister};
