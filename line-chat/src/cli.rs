use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address of the chat server, as host:port.
    #[arg(long, default_value = "localhost:8080")]
    pub server: String,

    /// Username to join with. Prompted for on the terminal when omitted.
    #[arg(long)]
    pub username: Option<String>,
}
