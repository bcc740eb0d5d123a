//! bard - song generation command line
//!
//! Generates lyrics, vocals, an instrumental and a final mix for one topic,
//! saves them under the output directory and prints a summary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bard_common::BardConfig;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bard_ai::providers::{HfInferenceClient, Providers};
use bard_ai::storage::FileStore;
use bard_ai::{SongEvent, SongPipeline, SongRequest, SongService};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Command-line arguments for bard
#[derive(Parser, Debug)]
#[command(name = "bard")]
#[command(about = "Generate an original song from a topic")]
#[command(version)]
struct Args {
    /// What the song is about
    topic: String,

    /// Musical style, e.g. "rock"
    #[arg(long)]
    style: Option<String>,

    /// Mood, e.g. "energetic"
    #[arg(long)]
    mood: Option<String>,

    /// Config file (TOML)
    #[arg(short, long, env = "BARD_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory, overrides `output.dir`
    #[arg(short, long, env = "BARD_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = BardConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bard v{}", env!("CARGO_PKG_VERSION"));
    debug!(config = ?config, "Configuration loaded");

    let api_token = config
        .resolve_api_token()
        .context("Inference API token is required")?;
    let client = HfInferenceClient::from_config(&config, api_token)
        .context("Failed to create inference client")?;
    let providers = Providers::from_client(Arc::new(client));

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let event_logger = tokio::spawn(log_events(event_rx));

    let pipeline = SongPipeline::from_config(providers, &config).events(event_tx);
    let service = SongService::new(pipeline, FileStore::new(config.output.dir.clone()));

    let mut request = SongRequest::new(args.topic);
    request.style = args.style;
    request.mood = args.mood;

    let result = service.generate_song(&request).await;

    // Dropping the service closes the event channel
    drop(service);
    if let Err(e) = event_logger.await {
        warn!("Event logger task failed: {}", e);
    }

    let response = result?;
    info!(song_id = %response.song_id, "Song saved");
    println!("{}", response.text);
    Ok(())
}

async fn log_events(mut rx: mpsc::Receiver<SongEvent>) {
    while let Some(event) = rx.recv().await {
        match serde_json::to_string(&event) {
            Ok(json) => debug!(target: "bard_ai::events", "{}", json),
            Err(e) => debug!("Unserializable event: {}", e),
        }
    }
}
