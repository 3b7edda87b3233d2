//! skirmish - play a combat on the terminal
//!
//! Type keys and press enter; `esc` sends Escape.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skirmish::combat::Collaborators;
use skirmish::ui::{EventLog, Key, Keymap, ScreenBuffer, SoundLog, Strings};
use skirmish::{CombatDriver, CombatSession, Config, Encounter, Party};

/// Terminal combat runner
#[derive(Parser, Debug)]
#[command(name = "skirmish", version, about = "Run a party vs monsters combat")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Encounter data file, overrides the configured one
    #[arg(short, long)]
    encounter: Option<PathBuf>,

    /// Party data file, overrides the configured one
    #[arg(short, long)]
    party: Option<PathBuf>,

    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, the screen goes to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skirmish=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if args.encounter.is_some() {
        config.encounter = args.encounter;
    }
    if args.party.is_some() {
        config.party = args.party;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let party = match &config.party {
        Some(path) => Party::load(path)?,
        None => Party::sample(),
    };
    let encounter = match &config.encounter {
        Some(path) => Encounter::load(path)?,
        None => Encounter::sample(),
    };
    let strings = match &config.strings {
        Some(path) => Strings::english().merged(Strings::load(path)?),
        None => Strings::english(),
    };

    let screen = ScreenBuffer::new();
    let keymap = Keymap::new();
    let events = EventLog::new();
    let io = Collaborators {
        canvas: Box::new(screen.clone()),
        audio: Box::new(SoundLog::new()),
        strings: Arc::new(strings),
        bindings: Arc::new(keymap.clone()),
        events: Box::new(events.clone()),
    };
    let session = CombatSession::new(&config, io, party, encounter)
        .context("failed to set up combat")?;

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    for key in Key::parse_line(&line) {
                        if tx.send(key).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(None) => return,
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    return;
                }
            }
        }
    });

    let driver = CombatDriver::new(
        session,
        keymap,
        screen,
        Duration::from_millis(config.tick_ms),
    );
    let session = driver
        .run(rx, |screen| {
            println!("{}", screen.render());
            for event in events.drain() {
                info!("{} <- {:?}", event.topic, event.message);
            }
        })
        .await;
    for event in events.drain() {
        info!("{} <- {:?}", event.topic, event.message);
    }

    match session.outcome() {
        Some(outcome) => info!(
            "combat ended: {:?}, {} experience",
            outcome,
            session.total_experience()
        ),
        None => info!("combat abandoned"),
    }
    for c in session.party().members.iter() {
        println!("{:<12} HP {:>3}/{:<3} XP {}", c.name, c.hp, c.max_hp, c.experience);
    }

    Ok(())
}
