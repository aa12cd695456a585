use std::{borrow::Cow, io, str};

/// Marker the server sends when it asks for a username. The client sends its
/// username unprompted, so any text carrying this marker is never shown.
pub const USERNAME_PROMPT: &str = "Enter your username:";

/// Reserved line that tells the server we are leaving.
pub const EXIT_COMMAND: &str = "/exit";

/// Upper bound for a single socket read in the receive loop.
pub const CHUNK_SIZE: usize = 1024;

/// One line typed at the console, classified for the send loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Nothing left after trimming trailing whitespace; not sent.
    Empty,
    /// The reserved exit command.
    Exit,
    /// Chat text or a server command, forwarded verbatim.
    Message(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let text = line.trim_end();
        if text.is_empty() {
            Input::Empty
        } else if text == EXIT_COMMAND {
            Input::Exit
        } else {
            Input::Message(text.to_string())
        }
    }
}

/// Appends the newline delimiter the server splits on.
pub fn encode_line(text: &str) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(text.len() + 1);
    encoded.extend_from_slice(text.as_bytes());
    encoded.push(b'\n');
    encoded
}

/// Removes every line segment that carries the username prompt.
///
/// A segment runs up to and including `\n`; the last one in a chunk may be
/// unterminated, as the server's prompt is. Text without the prompt is returned
/// untouched.
pub fn filter_prompt(text: &str) -> Cow<'_, str> {
    if !text.contains(USERNAME_PROMPT) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.split_inclusive('\n')
            .filter(|segment| !segment.contains(USERNAME_PROMPT))
            .collect(),
    )
}

/// Incremental UTF-8 decoder for fixed-size socket reads.
///
/// A multi-byte character split across two reads is held back until the rest
/// of it arrives. Bytes that can never form valid UTF-8 are an error.
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    pending: Vec<u8>,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, chunk: &[u8]) -> io::Result<String> {
        self.pending.extend_from_slice(chunk);

        let complete = match str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(err) => {
                self.pending.clear();
                return Err(to_io_error(err));
            }
        };

        let incomplete = self.pending.split_off(complete);
        let decoded = std::mem::replace(&mut self.pending, incomplete);
        String::from_utf8(decoded).map_err(|err| to_io_error(err.utf8_error()))
    }

    /// Bytes of an unfinished character still waiting for the next read.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn to_io_error(err: str::Utf8Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
