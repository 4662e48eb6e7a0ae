//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control
//! - File output with multiple formats (Full, Compact, JSON)

pub mod config;
pub mod error;

// Re-export main types
pub use config::*;
pub use error::LoggerError;

use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logger with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    // Create filter from level string
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    match (config.console.enabled, config.file.enabled) {
        (true, true) => init_both(&config, filter)?,
        (true, false) => init_console_only(&config.console, filter),
        (false, true) => init_file_only(&config.file, filter)?,
        (false, false) => {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }
    }

    Ok(())
}

fn init_console_only(config: &ConsoleConfig, filter: EnvFilter) {
    let is_tty = std::io::stdout().is_terminal();
    let use_ansi = config.colored && is_tty;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true),
        )
        .init();
}

fn init_file_only(config: &FileConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let writer = open_log_file(config)?;

    match config.format {
        LogFormat::Full => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(writer),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .compact()
                        .with_writer(writer),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).json().with_writer(writer))
                .init();
        }
    }

    Ok(())
}

fn init_both(config: &LoggerConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let is_tty = std::io::stdout().is_terminal();
    let use_ansi = config.console.colored && is_tty;
    let writer = open_log_file(&config.file)?;

    // IMPORTANT: File layer must be added BEFORE console layer to avoid ANSI codes
    // leaking into file output. Span field formatting follows the first layer's
    // ANSI setting. See: https://github.com/tokio-rs/tracing/issues/1817
    match config.file.format {
        LogFormat::Full => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);

            let console_layer = fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer)
                .init();
        }
        LogFormat::Compact => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .compact()
                .with_writer(writer);

            let console_layer = fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer)
                .init();
        }
        LogFormat::Json => {
            let file_layer = fmt::layer().with_ansi(false).json().with_writer(writer);

            let console_layer = fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer)
                .init();
        }
    }

    Ok(())
}

/// Opens the log file, creating parent directories as needed.
///
/// `Arc<File>` implements `MakeWriter` through its `&File: Write` impl,
/// which is enough here since the file is opened once and never rotated.
fn open_log_file(config: &FileConfig) -> Result<Arc<File>, LoggerError> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok(Arc::new(options.open(&config.path)?))
}
