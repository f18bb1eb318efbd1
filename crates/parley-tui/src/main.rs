//! Parley entry point.

use std::{fs::File, sync::Arc, time::Duration};

use clap::Parser;
use parley_tui::{Runtime, SimBackend};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Parley terminal messenger
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Terminal client for browsing chats and exchanging messages")]
#[command(version)]
struct Args {
    /// Milliseconds between scripted incoming messages from the simulated
    /// backend.
    #[arg(long, default_value_t = 6000)]
    tick_ms: u64,
}

/// Log to a file when `PARLEY_LOG` names one; stdout belongs to the TUI.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(path) = std::env::var("PARLEY_LOG") else {
        return Ok(());
    };

    let file = Arc::new(File::create(path)?);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(file).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;
    let args = Args::parse();

    let backend = SimBackend::spawn(Duration::from_millis(args.tick_ms));
    let runtime = Runtime::new(backend)?;
    Ok(runtime.run().await?)
}
