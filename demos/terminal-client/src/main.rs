//! Line-oriented terminal front end for a cardsync table.
//!
//! Type commands at the prompt; the table is redrawn whenever the server
//! pushes a change. Set `RUST_LOG=debug` to watch the protocol.

mod commands;

use cardsync::prelude::*;
use pico_args::Arguments;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use commands::{HELP, Input, parse_input};

const USAGE: &str = "\
Play at a cardsync table from the terminal

USAGE:
  terminal-client [OPTIONS]

OPTIONS:
  --url URL      Game server WebSocket URL  [default: ws://127.0.0.1:5000/ws]
  --name NAME    Player name to join tables with

FLAGS:
  -h, --help     Print help information
";

struct Args {
    url: String,
    name: Option<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{USAGE}");
        std::process::exit(0);
    }
    Ok(Args {
        url: pargs
            .opt_value_from_str("--url")?
            .unwrap_or_else(|| cardsync::DEFAULT_URL.to_owned()),
        name: pargs.opt_value_from_str("--name")?,
    })
}

fn render_notice(notice: &Notice) {
    match notice {
        Notice::JoinRejected { message, .. } => println!("! join refused: {message}"),
        Notice::GameClosed { game_id } => {
            println!("! table {game_id} was closed because no players remained")
        }
        Notice::RoundFinished {
            winner: Some(winner),
            pot,
        } => println!("* winner: {winner}, pot: {pot}"),
        Notice::RoundFinished { winner: None, pot } => println!("* no winner, pot: {pot}"),
    }
}

/// Prints everything the client reports until it goes away.
async fn render(mut events: tokio::sync::mpsc::Receiver<ClientEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            ClientEvent::Connected => println!("-- connected"),
            ClientEvent::Disconnected { reason } => println!("-- disconnected: {reason}"),
            ClientEvent::StateChanged(store) => println!("\n{}\n", project(&store)),
            ClientEvent::Notice(notice) => render_notice(&notice),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = ClientConfig::default().with_url(args.url);
    tracing::info!(url = %config.url, "connecting");
    let connector = WebSocketConnector::new(config.url.clone());
    let (client, events) = Client::start(config, connector);
    tokio::spawn(render(events));

    if let Some(name) = args.name {
        client.set_name(name).await?;
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_input(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        match input {
            Input::Command(command) => match client.execute(command).await {
                Ok(()) => {}
                Err(CardsyncError::ClientClosed) => {
                    eprintln!("client stopped");
                    break;
                }
                Err(e) => eprintln!("error: {e}"),
            },
            Input::Show => println!("\n{}\n", project(&client.state().await?)),
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    // Already stopped is fine.
    let _ = client.shutdown().await;
    Ok(())
}
