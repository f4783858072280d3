//! Raw input events and their touch interpretation.
//!
//! Sources hand the core a flat, ordered stream of [`RawEvent`] triples exactly as the
//! kernel reported them. The core only understands a handful of `(type, code)` pairs;
//! [`RawEvent::decode`] maps those to a [`TouchEvent`] and everything else to `None`.
//!
//! ## Value conventions
//! - **Absolute axes:** raw device units, not normalized. Ranges come from the device's
//!   capability table (see [`crate::calibration`]).
//! - **Tracking IDs:** `-1` means the contact in the current slot was lifted; any other
//!   value means a contact is present (new or continuing).
//!
//! There is no frame grouping here. `SYN_REPORT` and friends decode to `None` and the
//! consumer processes every event on its own, in stream order.

use serde::{Deserialize, Serialize};

/// `EV_ABS` event type.
pub const EV_ABS: u16 = 0x03;
/// Single-touch horizontal position.
pub const ABS_X: u16 = 0x00;
/// Single-touch vertical position.
pub const ABS_Y: u16 = 0x01;
/// Multi-touch tracking id report.
pub const ABS_MT_TRACKING_ID: u16 = 0x39;
/// Tracking id value meaning "finger lifted".
pub const TRACKING_ID_RELEASED: i32 = -1;

/// One event as read from an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

/// Absolute axis monitored for pointer motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Kernel `ABS_*` code for this axis.
    pub fn code(self) -> u16 {
        match self {
            Axis::X => ABS_X,
            Axis::Y => ABS_Y,
        }
    }
}

/// The subset of raw events the gesture core acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEvent {
    /// A tracking id other than the released sentinel: a finger is present.
    Contact { tracking_id: i32 },
    /// Tracking id went to `-1`.
    Lift,
    /// Absolute position sample.
    Axis { axis: Axis, value: i32 },
}

impl RawEvent {
    pub const fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// Convenience constructor for `EV_ABS` events.
    pub const fn abs(code: u16, value: i32) -> Self {
        Self::new(EV_ABS, code, value)
    }

    /// Interpret this event, or `None` if the core ignores it.
    pub fn decode(&self) -> Option<TouchEvent> {
        if self.event_type != EV_ABS {
            return None;
        }
        match self.code {
            ABS_MT_TRACKING_ID if self.value == TRACKING_ID_RELEASED => Some(TouchEvent::Lift),
            ABS_MT_TRACKING_ID => Some(TouchEvent::Contact {
                tracking_id: self.value,
            }),
            ABS_X => Some(TouchEvent::Axis {
                axis: Axis::X,
                value: self.value,
            }),
            ABS_Y => Some(TouchEvent::Axis {
                axis: Axis::Y,
                value: self.value,
            }),
            _ => None,
        }
    }
}
