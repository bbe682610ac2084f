//! Slidewrap Player - terminal entry point
//!
//! Plays the presentation with real timers. Commands are read from stdin one
//! per line; presentation events are printed to stdout, logs go to stderr.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use slidewrap_common::events::EventBus;
use slidewrap_common::TomlConfig;
use slidewrap_player::audio::SilentSink;
use slidewrap_player::runtime::{self, StopReason};
use slidewrap_player::share::NoClipboard;
use slidewrap_player::terminal::{BusRenderer, EventPrinter, TerminalCommand};
use slidewrap_player::{Presentation, TokioTimers};

/// Command-line arguments for slidewrap-player
#[derive(Parser, Debug)]
#[command(name = "slidewrap-player")]
#[command(about = "Timed slide presentation player")]
#[command(version)]
struct Args {
    /// Config file (TOML); falls back to SLIDEWRAP_CONFIG, then the platform config dir
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of slides
    #[arg(long, env = "SLIDEWRAP_SLIDES")]
    slides: Option<usize>,

    /// Auto-advance time per slide in milliseconds
    #[arg(long, env = "SLIDEWRAP_DURATION_MS")]
    duration_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SLIDEWRAP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print presentation events as JSON lines
    #[arg(long)]
    json: bool,
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "slidewrap_player={level},slidewrap_common={level}"
        ))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing; the level is refined once the config is loaded
    let (filter, filter_handle) =
        reload::Layer::new(log_filter(args.log_level.as_deref().unwrap_or("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(slides) = args.slides {
        config.deck.slide_count = slides;
    }
    if let Some(duration_ms) = args.duration_ms {
        config.deck.slide_duration_ms = duration_ms;
    }
    config.validate().context("Invalid configuration")?;

    if args.log_level.is_none() {
        filter_handle
            .reload(log_filter(&config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    info!(
        "Starting slidewrap player: {} slides, {}ms per slide",
        config.deck.slide_count, config.deck.slide_duration_ms
    );

    let events = Arc::new(EventBus::default());
    let printer = tokio::spawn(print_events(events.subscribe(), EventPrinter::new(args.json)));

    let (timers, mut fired_rx) = TokioTimers::new();
    let mut presentation = Presentation::new(
        &config,
        timers,
        BusRenderer::new(Arc::clone(&events)),
        Arc::clone(&events),
        Box::new(SilentSink::new(config.audio.track.as_deref())),
        Box::new(NoClipboard),
    );

    let (command_tx, mut command_rx) = mpsc::channel(32);
    spawn_command_reader(command_tx);

    let reason = runtime::run(
        &mut presentation,
        &mut fired_rx,
        &mut command_rx,
        shutdown_signal(),
    )
    .await;

    // Closing the bus lets the printer drain and exit
    drop(presentation);
    drop(events);
    printer.await.context("Event printer task failed")?;

    if reason == StopReason::InputClosed {
        info!("End of input");
    }
    info!("Shutdown complete");
    Ok(())
}

/// Read stdin on a plain thread and forward parsed commands
///
/// A blocking read on a detached thread never holds up process exit.
fn spawn_command_reader(tx: mpsc::Sender<TerminalCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            };
            match TerminalCommand::parse(&line) {
                Ok(Some(command)) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{}", e),
            }
        }
    });
}

async fn print_events(
    mut rx: broadcast::Receiver<slidewrap_common::PresentationEvent>,
    mut printer: EventPrinter,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(line) = printer.format(&event) {
                    println!("{}", line);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Event printer lagged, {} events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
