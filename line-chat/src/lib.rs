//! Terminal client for a newline-delimited TCP chat server.
//!
//! The client sends a username as its first line, then runs two activities
//! until the user leaves:
//!
//! - [`receiver`] reads the socket in fixed-size chunks on a background task,
//!   decodes them as UTF-8 and prints everything except the server's username
//!   prompt.
//! - [`client`] forwards console lines to the server. `/exit` tells the server
//!   we are leaving; Ctrl-C or end of input just closes the socket. Every other
//!   line, including server commands such as `/help`, is sent verbatim.
//!
//! [`console`] owns the blocking terminal reads, [`message`] the wire
//! constants and text handling, and [`cli`] the command line.

pub mod cli;
pub mod client;
pub mod console;
pub mod message;
pub mod receiver;
