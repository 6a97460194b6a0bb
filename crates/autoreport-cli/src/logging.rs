//! Logging setup: console plus a per-run log file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_DIR: &str = "output/logs";

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Returns the log file path, or `None` when it could not be created
/// (console logging still works).
pub fn init(verbose: bool) -> Option<PathBuf> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_path = log_file_path(Path::new(LOG_DIR));
    let file = fs::create_dir_all(LOG_DIR)
        .and_then(|_| File::create(&log_path))
        .ok();

    let file_layer = file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });
    let has_file = file_layer.is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    has_file.then_some(log_path)
}

fn log_file_path(dir: &Path) -> PathBuf {
    dir.join(format!(
        "pipeline_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}
