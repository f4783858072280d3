//! Input backends for `threefinger`.
//!
//! Implementations of [`InputSource`](crate::device::InputSource).
//!
//! # Feature flags
//! - **`evdev`**: Linux evdev device nodes (default).
//!
//! [`virtual_input`] is always available; it replays scripted events and is what the
//! tests drive the gesture core with.

use crate::device::InputSource;

#[cfg(all(feature = "evdev", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "evdev", target_os = "linux"))))]
pub mod linux;
pub mod virtual_input;

/// Unified discovery across enabled backends.
///
/// Currently this returns evdev devices on Linux when `evdev` is enabled, and nothing
/// elsewhere.
pub fn probe_devices() -> Vec<Box<dyn InputSource>> {
    let mut out: Vec<Box<dyn InputSource>> = Vec::new();

    #[cfg(all(feature = "evdev", target_os = "linux"))]
    {
        out.extend(self::linux::probe_devices());
    }

    out
}
