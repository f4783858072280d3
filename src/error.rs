//! Error types.
//!
//! Errors are split by how far they propagate:
//! - [`GestureError`] / [`PointerError`]: one event failed; logged and skipped.
//! - [`SourceError`]: the input stream itself failed; ends the read loop.
//! - [`BootstrapError`]: startup could not complete; the process exits non-zero.

use thiserror::Error;

/// Failure reading from an [`InputSource`](crate::device::InputSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// End of stream (device node closed, scripted source drained).
    #[error("input source closed")]
    Closed,

    #[error("input source read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure talking to the pointer-control capability.
#[derive(Debug, Error)]
pub enum PointerError {
    #[error("pointer controller unavailable: {0}")]
    Connect(String),

    #[error("pointer input failed: {0}")]
    Input(String),
}

/// A single event could not be fully applied.
///
/// Gesture state has already been updated when one of these is returned.
#[derive(Debug, Error)]
pub enum GestureError {
    #[error("pressing primary button failed: {0}")]
    Press(#[source] PointerError),

    #[error("releasing primary button failed: {0}")]
    Release(#[source] PointerError),

    #[error("moving pointer failed: {0}")]
    Move(#[source] PointerError),
}

/// Startup failed; the daemon cannot run.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("must be run as root (effective uid {0})")]
    NotRoot(u32),

    #[error("could not determine effective uid: {0}")]
    Privilege(#[source] std::io::Error),

    #[error("no touchpad found among available input devices")]
    NoTouchpad,

    #[error("pointer controller unavailable after {attempts} attempts: {last}")]
    PointerUnavailable { attempts: u32, last: PointerError },

    #[error("installing signal handler failed: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("spawning worker thread failed: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("worker thread exited before startup completed")]
    WorkerExited,
}
