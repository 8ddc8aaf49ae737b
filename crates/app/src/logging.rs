//! Tracing subscriber for the binary
//!
//! stderr gets `RUST_LOG` when set, else `warn` (or `debug` under
//! `--verbose`). Every debug event also goes to `logs/colorpick.log`,
//! rotated daily.

use crate::paths::AppPaths;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "colorpick.log";

/// stderr filter. A non-empty, parseable directive overrides the flag.
fn console_filter(verbose: bool, directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

pub fn init(verbose: bool) {
    let directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_filter(verbose, directive.as_deref()));

    let logs_dir = AppPaths::locate()
        .ok_or_else(|| anyhow::anyhow!("No config directory available"))
        .and_then(|paths| paths.create_logs_dir());
    let file_layer = match logs_dir {
        Ok(dir) => Some(
            fmt::layer()
                .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE))
                .with_ansi(false)
                .with_line_number(true)
                .with_filter(EnvFilter::new("debug")),
        ),
        Err(e) => {
            // No subscriber yet, so this cannot go through tracing
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
