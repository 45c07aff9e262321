//! Logging Module
//!
//! Structured logging with file output for diagnostics.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging under the platform-local data directory
pub fn init() {
    init_at(&default_log_dir());
}

/// Initialize logging with a daily-rolling file in `log_dir` plus, in
/// debug builds, a pretty console layer. `RUST_LOG` overrides the
/// default filter.
pub fn init_at(log_dir: &Path) {
    let _ = std::fs::create_dir_all(log_dir);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            log_dir,
            "wearcity-companion.log",
        ));

    #[cfg(debug_assertions)]
    let console_layer = Some(fmt::layer().with_target(true).pretty());
    #[cfg(not(debug_assertions))]
    let console_layer: Option<fmt::Layer<_>> = None;

    // Ignore the error if a subscriber is already installed (tests)
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer),
    );
}

fn default_filter() -> EnvFilter {
    #[cfg(debug_assertions)]
    {
        EnvFilter::new("debug,hyper=warn,reqwest=warn")
    }
    #[cfg(not(debug_assertions))]
    {
        EnvFilter::new("info,hyper=warn,reqwest=warn")
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("WearCity")
        .join("logs")
}
