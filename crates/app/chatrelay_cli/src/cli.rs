use clap::{Parser, Subcommand};
use url::Url;

pub const DEFAULT_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "chatrelay", about = "Terminal client for the chatrelay widget")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat interactively, one message per line. `/quit` or EOF ends the session.
    Chat {
        /// Relay server root.
        #[arg(long, env = "CHATRELAY_URL", default_value = DEFAULT_URL)]
        url: Url,
    },
    /// Send a single message and print the reply.
    Send {
        /// Relay server root.
        #[arg(long, env = "CHATRELAY_URL", default_value = DEFAULT_URL)]
        url: Url,

        /// Message text.
        message: String,
    },
    /// Print the client version.
    Version,
}
