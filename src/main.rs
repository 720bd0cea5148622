//! carnotif: replay recorded notification events through the center.
//!
//! Reads a JSON array of events, feeds them through the notification center
//! one at a time and prints every published update as a JSON line.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use carnotif_lib::center::{CenterEvent, NotificationCenter};
use carnotif_lib::state::{load_config, load_default_config, SessionState};

const EVENT_CHANNEL_SIZE: usize = 32;

#[derive(Parser, Debug)]
#[command(name = "carnotif")]
#[command(about = "In-car notification center pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON file of center events and print each update
    Replay {
        #[arg(value_name = "EVENTS")]
        events: PathBuf,

        /// Config file (defaults to ~/.carnotif/config.json)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Replay { events, config } => replay(events, config).await,
    }
}

async fn replay(events: PathBuf, config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => load_config(&path)?,
        None => load_default_config()?,
    };

    let content = fs::read_to_string(&events)
        .with_context(|| format!("Failed to read events from {}", events.display()))?;
    let events: Vec<CenterEvent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events in {}", events.display()))?;
    log::info!("Replaying {} events", events.len());

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
    let (update_tx, mut update_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);

    let center = tokio::spawn(async move {
        let mut center = NotificationCenter::new(SessionState::with_config(config));
        center.run(event_rx, update_tx).await;
    });

    let feeder = tokio::spawn(async move {
        for event in events {
            if event_tx.send(event).await.is_err() {
                break;
            }
        }
    });

    while let Some(update) = update_rx.recv().await {
        println!("{}", serde_json::to_string(&update)?);
    }

    feeder.await?;
    center.await?;
    Ok(())
}
