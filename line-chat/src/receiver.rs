use std::io;

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::message::{CHUNK_SIZE, ChunkDecoder, filter_prompt};

/// How the receive loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveEnd {
    /// The server closed its side of the connection.
    ServerClosed,
    /// A read, decode or output error ended the loop.
    Failed,
}

/// Runs the receive loop on its own task.
///
/// The handle is never joined on the normal exit path; the session aborts it.
pub fn spawn<R, W>(reader: R, output: W) -> JoinHandle<ReceiveEnd>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(run(reader, output))
}

/// Copies server text to `output` until the connection closes or fails.
///
/// Errors end this loop only; the send loop keeps running.
pub async fn run<R, W>(mut reader: R, mut output: W) -> ReceiveEnd
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match receive_chunks(&mut reader, &mut output).await {
        Ok(()) => {
            info!("server closed the connection");
            ReceiveEnd::ServerClosed
        }
        Err(error) => {
            warn!(?error, "error receiving message");
            ReceiveEnd::Failed
        }
    }
}

async fn receive_chunks<R, W>(reader: &mut R, output: &mut W) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut decoder = ChunkDecoder::new();

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            if decoder.pending_len() > 0 {
                debug!(
                    pending = decoder.pending_len(),
                    "connection closed inside a character"
                );
            }
            return Ok(());
        }

        let text = decoder.decode(&buffer[..bytes_read])?;
        render_text(&text, output).await?;
    }
}

async fn render_text<W>(text: &str, output: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let visible = filter_prompt(text);
    if visible.len() != text.len() {
        debug!("suppressed username prompt");
    }
    if visible.is_empty() {
        return Ok(());
    }

    output.write_all(visible.as_bytes()).await?;
    output.flush().await
}
