use std::{
    io::{self, BufRead, Write},
    thread,
};

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const USERNAME_QUESTION: &str = "Enter your username and type command /help for more info: ";

/// Lines typed at the console are handed to the send loop through a small
/// bounded queue; the reader thread blocks while it is full.
const LINE_QUEUE_DEPTH: usize = 16;

/// Reads console lines on a dedicated thread.
///
/// Blocking reads stay off the runtime, so an interrupt or `/exit` can end the
/// process while a read is still pending. The channel closes at end of input or
/// on a read error.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<mpsc::Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(LINE_QUEUE_DEPTH);
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || forward_lines(reader, sender))?;
    Ok(receiver)
}

fn forward_lines<R: BufRead>(reader: R, lines: mpsc::Sender<String>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if lines.blocking_send(line).is_err() {
                    debug!("send loop gone; console reader stopping");
                    return;
                }
            }
            Err(error) => {
                warn!(?error, "failed to read console input");
                return;
            }
        }
    }
    debug!("console input closed");
}

/// Asks for a username on the terminal.
pub fn prompt_username() -> Result<String> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    read_username(&mut stdin.lock(), &mut stdout.lock())
}

pub fn read_username<R, W>(input: &mut R, output: &mut W) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    output
        .write_all(USERNAME_QUESTION.as_bytes())
        .and_then(|()| output.flush())
        .context("failed to write username prompt")?;

    let mut line = String::new();
    let bytes_read = input
        .read_line(&mut line)
        .context("failed to read username")?;
    if bytes_read == 0 {
        bail!("input closed before a username was entered");
    }

    normalize_username(&line)
}

pub fn normalize_username(raw: &str) -> Result<String> {
    let username = raw.trim_end();
    if username.trim_start().is_empty() {
        bail!("username cannot be empty");
    }
    if username.contains('\n') {
        bail!("username must fit on a single line");
    }
    Ok(username.to_string())
}
