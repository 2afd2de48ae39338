//! Tracing subscriber setup.
//!
//! Interactive chat owns the terminal, so its logs go to a file under
//! `${PARLEY_HOME}/logs`. One-shot commands log to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// File name used for interactive session logs.
pub const LOG_FILE_NAME: &str = "parley.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Append to `<dir>/parley.log` through a background writer.
    File(&'a Path),
    /// Write to stderr.
    Stderr,
}

/// Keeps the background log writer alive. Drop it last.
#[derive(Debug)]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Builds an `EnvFilter` from a directive, falling back to `fallback` when the
/// directive does not parse.
fn build_filter(directive: &str, fallback: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs the global tracing subscriber.
///
/// Returns an error if a global subscriber is already set or the log
/// directory cannot be created.
pub fn init(target: LogTarget<'_>, directive: &str) -> Result<LogGuard> {
    match target {
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .with(build_filter(directive, "info"))
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(LogGuard {
                _worker: Some(guard),
            })
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .without_time(),
                )
                .with(build_filter(directive, "warn"))
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Ok(LogGuard { _worker: None })
        }
    }
}
