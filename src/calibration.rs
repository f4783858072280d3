//! Absolute-axis range table.
//!
//! Read once from the selected device's capability metadata and logged. The ranges are
//! advisory: motion scaling is a fixed constant and samples are never clamped to them.
//! The gesture machine only uses [`AxisRangeTable::contains`] to flag out-of-range
//! samples in debug logs.

use crate::event::{Axis, ABS_X, ABS_Y};
use crate::metadata::DeviceMeta;
use serde::Serialize;
use tracing::info;

/// Declared `(min, max)` of one axis. `(0, 0)` means the device declared nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub fn is_declared(&self) -> bool {
        (self.min, self.max) != (0, 0)
    }

    /// Whether `value` lies inside the declared range. Undeclared ranges contain everything.
    pub fn contains(&self, value: i32) -> bool {
        !self.is_declared() || (self.min..=self.max).contains(&value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AxisRangeTable {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl AxisRangeTable {
    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn contains(&self, axis: Axis, value: i32) -> bool {
        self.range(axis).contains(value)
    }
}

/// Extract the horizontal/vertical ranges from `meta`, defaulting to `(0, 0)`.
pub fn calibrate(meta: &DeviceMeta) -> AxisRangeTable {
    let range = |code| {
        meta.capabilities
            .abs_axis(code)
            .map(|info| AxisRange {
                min: info.minimum,
                max: info.maximum,
            })
            .unwrap_or_default()
    };

    let table = AxisRangeTable {
        x: range(ABS_X),
        y: range(ABS_Y),
    };
    info!("X range: {} to {}", table.x.min, table.x.max);
    info!("Y range: {} to {}", table.y.min, table.y.max);
    table
}
