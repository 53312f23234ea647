// src/chat/transport.rs
// =============================================================================
// Delivery of chat replies.
//
// ChatTransport is the seam a real messenger integration plugs into. The
// OutboxTransport shipped here prints text replies and stores documents in
// a directory, which is what `repo-scribe chat` uses.
//
// Rust concepts:
// - Generics: OutboxTransport<W> works with stdout in main and Vec<u8> in tests
// - Trait objects: deliver() takes &mut dyn ChatTransport
// =============================================================================

use super::handler::Reply;
use crate::error::ScribeError;
use crate::sink::Attachment;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[async_trait]
pub trait ChatTransport: Send {
    async fn send_text(&mut self, text: &str) -> Result<(), ScribeError>;

    async fn send_document(
        &mut self,
        attachment: &Attachment,
        caption: &str,
    ) -> Result<(), ScribeError>;
}

/// Sends every reply, in order. Stops at the first transport failure.
pub async fn deliver(
    transport: &mut dyn ChatTransport,
    replies: Vec<Reply>,
) -> Result<(), ScribeError> {
    for reply in replies {
        match reply {
            Reply::Text(text) => transport.send_text(&text).await?,
            Reply::Document {
                attachment,
                caption,
            } => transport.send_document(&attachment, &caption).await?,
        }
    }
    Ok(())
}

/// Text goes to `out`, documents become files in `dir`.
pub struct OutboxTransport<W> {
    dir: PathBuf,
    out: W,
}

impl<W: Write + Send> OutboxTransport<W> {
    pub fn new(dir: impl Into<PathBuf>, out: W) -> Self {
        Self {
            dir: dir.into(),
            out,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> ChatTransport for OutboxTransport<W> {
    async fn send_text(&mut self, text: &str) -> Result<(), ScribeError> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    async fn send_document(
        &mut self,
        attachment: &Attachment,
        caption: &str,
    ) -> Result<(), ScribeError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&attachment.file_name);
        fs::write(&path, &attachment.bytes)?;

        info!(path = %path.display(), bytes = attachment.bytes.len(), "Document delivered");
        writeln!(self.out, "📎 {} ({})", path.display(), caption)?;
        Ok(())
    }
}
