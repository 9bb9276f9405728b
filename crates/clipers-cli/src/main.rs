//! Clipers CLI - a command-line client for the Clipers job and video platform.
//!
//! Signs in, keeps the token pair in the chosen store, and exposes jobs,
//! clipers, feed and company calls. Results go to stdout as JSON; prompts,
//! progress and logs go to stderr.

mod cli;
mod commands;
mod config;
mod output;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Args;
use config::Settings;

/// Base name of the rotated log files written with `--log-dir`
const LOG_FILE_NAME: &str = "clipers.log";

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `-v`. The returned guard flushes the log file and
/// must live until exit.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let _log_guard = init_tracing(args.verbose, args.log_dir.as_deref());
    info!("Clipers CLI starting");

    let mut settings = Settings::load().unwrap_or_else(|e| {
        warn!("Failed to load settings, using defaults: {}", e);
        Settings::default()
    });

    commands::run(args, &mut settings).await
}
