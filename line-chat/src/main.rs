use anyhow::{Context, Result};
use clap::Parser;

use line_chat::{cli::Cli, client, console};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Diagnostics go to stderr so they never interleave with chat text.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let username = match cli.username {
        Some(name) => console::normalize_username(&name)?,
        None => tokio::task::spawn_blocking(console::prompt_username)
            .await
            .context("username prompt panicked")??,
    };

    client::run(&cli.server, &username).await
}
