//! Device metadata snapshot.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of an input source suitable
//! for logging and for the touchpad selection heuristic. Backends populate it once at
//! enumeration time; nothing here is refreshed afterwards.
//!
//! # Conventions
//! - `name` is the kernel-reported device name (`"Unknown"` when the device has none).
//! - `path` is an OS path (e.g. `/dev/input/event7`) and is diagnostic only; it may change
//!   across reboots and reconnects.
//! - `capabilities` mirrors the device's declared event types and, for absolute axes,
//!   the declared min/max.
//!
//! # Example
//! ```
//! use threefinger::metadata::{Capabilities, DeviceMeta};
//! use threefinger::event::{ABS_X, ABS_Y};
//!
//! let meta = DeviceMeta::new("Synaptics TouchPad", "/dev/input/event7")
//!     .with_capabilities(Capabilities::absolute([(ABS_X, 0, 1200), (ABS_Y, 0, 800)]));
//! assert!(meta.capabilities.has_absolute());
//! ```

use crate::event::EV_ABS;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Declared range of one absolute axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsAxisInfo {
    pub minimum: i32,
    pub maximum: i32,
}

/// Declared capability table of a device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Supported event types (`EV_*` codes).
    pub event_types: BTreeSet<u16>,

    /// Absolute axes keyed by `ABS_*` code.
    ///
    /// Only populated when the device supports `EV_ABS`.
    pub abs_axes: BTreeMap<u16, AbsAxisInfo>,
}

impl Capabilities {
    /// Capability table declaring `EV_ABS` with the given `(code, min, max)` axes.
    pub fn absolute(axes: impl IntoIterator<Item = (u16, i32, i32)>) -> Self {
        let mut caps = Self::default();
        caps.event_types.insert(EV_ABS);
        for (code, minimum, maximum) in axes {
            caps.abs_axes.insert(code, AbsAxisInfo { minimum, maximum });
        }
        caps
    }

    pub fn supports(&self, event_type: u16) -> bool {
        self.event_types.contains(&event_type)
    }

    /// Whether the device can emit absolute-axis events at all.
    pub fn has_absolute(&self) -> bool {
        self.supports(EV_ABS)
    }

    pub fn abs_axis(&self, code: u16) -> Option<AbsAxisInfo> {
        self.abs_axes.get(&code).copied()
    }
}

/// Snapshot of metadata describing a single input source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Kernel-reported display name.
    pub name: String,

    /// OS path to the device node.
    pub path: String,

    /// Declared event types and absolute axis ranges.
    pub capabilities: Capabilities,
}

impl DeviceMeta {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            capabilities: Capabilities::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

impl std::fmt::Display for DeviceMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}
