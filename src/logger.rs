//! Log sink setup.
//!
//! Every line goes to standard output and, when it can be opened, to an append-mode log
//! file. Level filtering follows `RUST_LOG` and defaults to `info`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(log_file: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (file_layer, file_error) = match open_log_file(log_file) {
        Ok(f) => (
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(f))
                    .with_ansi(false),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .is_ok();

    if let (true, Some(e)) = (installed, file_error) {
        warn!("Logging to stdout only; cannot open {}: {}", log_file.display(), e);
    }
}
