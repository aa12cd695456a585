use std::{future::Future, io::BufReader};

use anyhow::{Context, Result};
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    select,
    sync::mpsc,
};
use tracing::{debug, info, warn};

use crate::{
    console,
    message::{EXIT_COMMAND, Input, encode_line},
    receiver,
};

/// Why the send loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed the exit command and the server was told.
    ExitCommand,
    /// Ctrl-C arrived while waiting for input.
    Interrupted,
    /// The console reached end of input.
    InputClosed,
}

/// Write side of the chat connection.
///
/// Closing is idempotent: the socket is shut down by the first call only.
pub struct Connection<W> {
    writer: Option<W>,
}

impl<W> Connection<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    pub async fn send_line(&mut self, text: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .context("connection is already closed")?;
        writer
            .write_all(&encode_line(text))
            .await
            .context("failed to send line to server")?;
        writer.flush().await.context("failed to flush connection")?;
        Ok(())
    }

    /// Shuts the socket down. Returns `false` if it was already closed.
    pub async fn close(&mut self) -> bool {
        let Some(mut writer) = self.writer.take() else {
            return false;
        };

        if let Err(error) = writer.shutdown().await {
            warn!(?error, "failed to shutdown connection cleanly");
        }
        debug!("connection closed");
        true
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

/// Connects to `server`, sends the username and chats until the user leaves.
pub async fn run(server: &str, username: &str) -> Result<()> {
    let (reader, writer) = connect(server).await?;
    let mut connection = Connection::new(writer);
    connection
        .send_line(username)
        .await
        .context("failed to send username")?;
    info!(%username, "joined chat");

    let receiver = receiver::spawn(reader, tokio::io::stdout());
    let mut lines = console::spawn_line_reader(BufReader::new(std::io::stdin()))
        .context("failed to start console reader")?;

    let outcome = run_session(&mut lines, &mut connection, ctrl_c()).await;
    receiver.abort();

    let mut stdout = tokio::io::stdout();
    finish_session(outcome, &mut connection, &mut stdout).await
}

/// Reports the end of the session on `console` and closes the connection.
///
/// The socket is closed on every path, even when the console write fails.
pub async fn finish_session<W, O>(
    outcome: Result<SessionEnd>,
    connection: &mut Connection<W>,
    console: &mut O,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
    O: AsyncWrite + Unpin,
{
    let end = match outcome {
        Ok(end) => end,
        Err(error) => {
            connection.close().await;
            return Err(error);
        }
    };

    info!(?end, "session ended");
    let printed = write_line(console, "Disconnected.").await;
    connection.close().await;
    printed.context("failed to write to console")
}

pub async fn connect(server: &str) -> Result<(OwnedReadHalf, OwnedWriteHalf)> {
    let stream = TcpStream::connect(server)
        .await
        .with_context(|| format!("failed to connect to {server}"))?;

    info!("connected to {server}");
    Ok(stream.into_split())
}

/// Forwards console lines to the server until exit, end of input, or
/// `interrupt` resolves. The connection is left open for the caller to close.
pub async fn run_session<W, F>(
    lines: &mut mpsc::Receiver<String>,
    connection: &mut Connection<W>,
    interrupt: F,
) -> Result<SessionEnd>
where
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    loop {
        select! {
            _ = &mut interrupt => return Ok(SessionEnd::Interrupted),
            line = lines.recv() => {
                if let Some(end) = handle_console_line(line, connection).await? {
                    return Ok(end);
                }
            }
        }
    }
}

async fn handle_console_line<W>(
    line: Option<String>,
    connection: &mut Connection<W>,
) -> Result<Option<SessionEnd>>
where
    W: AsyncWrite + Unpin,
{
    let Some(line) = line else {
        return Ok(Some(SessionEnd::InputClosed));
    };

    match Input::parse(&line) {
        Input::Empty => Ok(None),
        Input::Exit => {
            connection.send_line(EXIT_COMMAND).await?;
            Ok(Some(SessionEnd::ExitCommand))
        }
        Input::Message(text) => {
            connection.send_line(&text).await?;
            Ok(None)
        }
    }
}

async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(?error, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}

async fn write_line<O>(output: &mut O, line: &str) -> std::io::Result<()>
where
    O: AsyncWrite + Unpin,
{
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
