//! Pointer-control sink.
//!
//! [`PointerSink`] is the only surface the gesture core uses to act on the desktop:
//! press/release the primary button and read/write the absolute pointer position.
//! The production implementation is [`EnigoPointer`] (feature `enigo`).
//!
//! Connecting to the desktop can fail transiently right after login, so
//! [`connect_with_retry`] retries a bounded number of times with a fixed backoff.
//! Sleeping goes through [`Clock`] so tests can exhaust the retries instantly.

use crate::error::{BootstrapError, PointerError};
use std::time::Duration;
use tracing::{error, info};

/// Pointer-control capability.
pub trait PointerSink {
    fn press_button(&mut self) -> Result<(), PointerError>;
    fn release_button(&mut self) -> Result<(), PointerError>;
    fn position(&mut self) -> Result<(i32, i32), PointerError>;
    fn set_position(&mut self, x: i32, y: i32) -> Result<(), PointerError>;
}

/// Blocking sleep, injectable for tests.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

/// Real thread sleep.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Bounded, fixed-backoff retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: crate::config::CONNECT_ATTEMPTS,
            backoff: crate::config::CONNECT_BACKOFF,
        }
    }
}

/// Build a pointer sink, retrying `connect` up to `policy.attempts` times.
///
/// Sleeps `policy.backoff` after every failed attempt (including the last, matching the
/// bootstrap's fixed cadence). Fails with [`BootstrapError::PointerUnavailable`] carrying
/// the last error once the attempts are used up.
pub fn connect_with_retry<T, F>(
    mut connect: F,
    policy: RetryPolicy,
    clock: &dyn Clock,
) -> Result<T, BootstrapError>
where
    F: FnMut() -> Result<T, PointerError>,
{
    let mut last = PointerError::Connect("no connection attempt made".into());
    for attempt in 1..=policy.attempts {
        match connect() {
            Ok(sink) => {
                info!("Successfully initialized pointer controller");
                return Ok(sink);
            }
            Err(e) => {
                error!(
                    "Failed to initialize pointer controller (attempt {}/{}): {}",
                    attempt, policy.attempts, e
                );
                last = e;
                clock.sleep(policy.backoff);
            }
        }
    }
    error!("Could not initialize pointer controller after multiple attempts");
    Err(BootstrapError::PointerUnavailable {
        attempts: policy.attempts,
        last,
    })
}

#[cfg(feature = "enigo")]
pub use self::enigo_sink::EnigoPointer;

#[cfg(feature = "enigo")]
mod enigo_sink {
    use super::PointerSink;
    use crate::error::PointerError;
    use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

    /// Pointer sink backed by `enigo` on the current display session.
    ///
    /// Not `Send` on every backend; construct it on the thread that uses it.
    pub struct EnigoPointer {
        enigo: Enigo,
    }

    impl EnigoPointer {
        pub fn connect() -> Result<Self, PointerError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| PointerError::Connect(e.to_string()))?;
            Ok(Self { enigo })
        }
    }

    fn input(e: enigo::InputError) -> PointerError {
        PointerError::Input(e.to_string())
    }

    impl PointerSink for EnigoPointer {
        fn press_button(&mut self) -> Result<(), PointerError> {
            self.enigo
                .button(Button::Left, Direction::Press)
                .map_err(input)
        }

        fn release_button(&mut self) -> Result<(), PointerError> {
            self.enigo
                .button(Button::Left, Direction::Release)
                .map_err(input)
        }

        fn position(&mut self) -> Result<(i32, i32), PointerError> {
            self.enigo.location().map_err(input)
        }

        fn set_position(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
            self.enigo.move_mouse(x, y, Coordinate::Abs).map_err(input)
        }
    }
}
