use std::net::TcpListener;

use anyhow::Result;
use assert_cmd::{Command, cargo::cargo_bin};

fn line_chat() -> Command {
    let mut cmd = Command::new(cargo_bin!("line-chat"));
    cmd.env("RUST_LOG", "off");
    cmd
}

/// An address nothing listens on.
fn dead_address() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.to_string())
}

#[test]
fn help_documents_the_options() -> Result<()> {
    let output = line_chat().arg("--help").output()?;
    assert!(output.status.success());

    let help = String::from_utf8(output.stdout)?;
    assert!(help.contains("--server"));
    assert!(help.contains("--username"));
    Ok(())
}

#[test]
fn blank_username_is_rejected() -> Result<()> {
    let addr = dead_address()?;
    line_chat()
        .args(["--server", &addr, "--username", "   "])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn unreachable_server_fails() -> Result<()> {
    let addr = dead_address()?;
    line_chat()
        .args(["--server", &addr, "--username", "alice"])
        .write_stdin("")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn username_is_prompted_when_omitted() -> Result<()> {
    let addr = dead_address()?;
    let output = line_chat()
        .args(["--server", &addr])
        .write_stdin("\n")
        .output()?;

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("Enter your username and type command /help for more info: "));
    Ok(())
}
