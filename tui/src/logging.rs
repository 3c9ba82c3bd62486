//! Logging
//!
//! The terminal belongs to the canvas, so tracing output goes to a file:
//! `$VIVIAN_LOG`, or `vivian-tui.log` in the temp dir.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "vivian_tui=info,animator_core=info";

/// Log file location from a key lookup (normally the environment)
pub fn log_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    match lookup("VIVIAN_LOG") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => std::env::temp_dir().join("vivian-tui.log"),
    }
}

/// Initialize logging into `path`, appending
pub fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot initialize logging: {e}"))?;

    Ok(())
}
