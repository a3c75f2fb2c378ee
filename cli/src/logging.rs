//! Logging initialization. Stdout stays reserved for answers.
//!
//! - **RUST_LOG**: filter, e.g. `info`, `synth=debug`. Default: `info`.
//! - **LOG_FILE**: when set, logs are appended there (no ANSI).
//! - `-v/--verbose` without `LOG_FILE`: logs go to stderr.
//!
//! Otherwise logs are dropped.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Installs the global subscriber. Keep the returned guard alive until exit so buffered
/// file logs are flushed.
pub fn init(verbose: bool) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let default = if verbose { "debug,hyper_util=off" } else { "info,hyper_util=off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if let Ok(path) = std::env::var("LOG_FILE") {
        let path = Path::new(&path);
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let name = path.file_name().ok_or("LOG_FILE has no file name")?;
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter);
        tracing_subscriber::registry().with(layer).try_init()?;
        tracing::info!(path = %path.display(), "synth logging to file");
        return Ok(Some(guard));
    }

    if verbose {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter);
        tracing_subscriber::registry().with(layer).try_init()?;
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::sink)
            .with_filter(filter);
        tracing_subscriber::registry().with(layer).try_init()?;
    }
    Ok(None)
}
