// src/chat/mod.rs
// =============================================================================
// The chat front end.
//
// Submodules:
// - handler: message text -> replies (uses the same pipeline as the CLI)
// - transport: how replies leave the process
//
// run_session drives a line-oriented conversation: one input line is one
// incoming message.
// =============================================================================

mod handler;
mod transport;

pub use handler::ChatHandler;
#[cfg(test)]
use handler::HELP_TEXT;
pub use transport::{deliver, ChatTransport, OutboxTransport};

use crate::error::ScribeError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Handles messages until `input` is exhausted. Returns how many were handled.
pub async fn run_session<R>(
    handler: &ChatHandler<'_>,
    transport: &mut dyn ChatTransport,
    input: R,
) -> Result<usize, ScribeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!(message = %line, "Incoming message");

        let replies = handler.handle(&line).await;
        deliver(transport, replies).await?;
        handled += 1;
    }

    Ok(handled)
}
