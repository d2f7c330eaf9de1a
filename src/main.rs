use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use voice_relay::config::Config;
use voice_relay::host::run_host_loop;

#[tokio::main]
async fn main() {
    // stdout carries the host protocol, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("voice_relay=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("Voice relay stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = Arc::new(Config::from_env());
    info!(
        "Voice relay online (speak: {}, fallback: {}, capture: {})",
        config.speak_url,
        config.fallback_bin.display(),
        config.save_responses
    );

    let (tx, rx) = mpsc::unbounded_channel::<String>();

    // 1. Host frames arrive on stdin, one per line
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read from host: {}", e);
                    break;
                }
            }
        }
    });

    // 2. Handle them one at a time
    let host = voice_relay::build_host(Arc::clone(&config));
    let mut stdout = tokio::io::stdout();
    run_host_loop(host, rx, &mut stdout).await?;

    info!("Host closed the stream, shutting down.");
    Ok(())
}
