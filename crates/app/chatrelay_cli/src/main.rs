// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use chatrelay_core::client::HttpRelayTransport;
use chatrelay_core::session::{ChatView, Session, SubmitOutcome};
use clap::Parser;
use cli::{Cli, Commands};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;
use view::TerminalView;

mod cli;
mod logging;
mod view;

const QUIT: &str = "/quit";

#[tokio::main]
async fn main() -> Result<()> {
    // Held for the whole process so the final error is still logged.
    let _logger = logging::init()?;

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Send { url, message } => send(url, message).await?,
        Commands::Chat { url } => chat(url).await?,
    }

    Ok(())
}

async fn send(url: &Url, message: &str) -> Result<()> {
    let transport = HttpRelayTransport::new(url)?;
    let mut session = Session::new(transport, TerminalView::plain(std::io::stdout()));

    match session.submit(message).await {
        SubmitOutcome::Replied(_) => Ok(()),
        SubmitOutcome::Failed(text) => Err(Error::TurnFailed(text)),
        SubmitOutcome::Ignored => Err(Error::Custom("message is empty".into())),
    }
}

async fn chat(url: &Url) -> Result<()> {
    let transport = HttpRelayTransport::new(url)?;
    log::info!("chatting with {}", transport.endpoint());

    let mut session = Session::new(transport, TerminalView::interactive(std::io::stdout()));
    session.view_mut().focus_input();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT {
            break;
        }
        if session.submit(&line).await == SubmitOutcome::Ignored {
            session.view_mut().focus_input();
        }
    }

    log::info!("session ended after {} turns", session.transcript().len());
    Ok(())
}
