//! Touchpad selection heuristic.
//!
//! Rules, in order:
//! 1. The first device whose name contains `"touchpad"` (case-insensitive).
//! 2. Otherwise the first device declaring absolute-axis events.
//! 3. Otherwise nothing.
//!
//! [`choose`] is a pure function over enumerated metadata; [`select_touchpad`] applies it
//! to already-opened sources and hands back the winner.

use crate::device::InputSource;
use crate::metadata::DeviceMeta;
use tracing::{error, info};

/// Why a device was picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionReason {
    /// Name contains "touchpad".
    NameMatch,
    /// Fallback: first device with absolute axes.
    AbsoluteAxes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Index into the slice passed to [`choose`].
    pub index: usize,
    pub reason: SelectionReason,
}

fn is_named_touchpad(meta: &DeviceMeta) -> bool {
    meta.name.to_lowercase().contains("touchpad")
}

/// Pick the device most likely to be a touchpad.
pub fn choose(devices: &[DeviceMeta]) -> Option<Selection> {
    if let Some(index) = devices.iter().position(is_named_touchpad) {
        return Some(Selection {
            index,
            reason: SelectionReason::NameMatch,
        });
    }

    devices
        .iter()
        .position(|d| d.capabilities.has_absolute())
        .map(|index| Selection {
            index,
            reason: SelectionReason::AbsoluteAxes,
        })
}

/// Apply [`choose`] to opened sources, dropping the ones not selected.
pub fn select_touchpad(mut sources: Vec<Box<dyn InputSource>>) -> Option<Box<dyn InputSource>> {
    info!("Found {} input devices", sources.len());

    let metas: Vec<DeviceMeta> = sources.iter().map(|s| s.metadata()).collect();
    for meta in &metas {
        info!("Checking device: {meta}");
    }

    match choose(&metas) {
        Some(Selection { index, reason }) => {
            match reason {
                SelectionReason::NameMatch => info!("Found touchpad: {}", metas[index]),
                SelectionReason::AbsoluteAxes => {
                    info!("Found potential touchpad device: {}", metas[index])
                }
            }
            Some(sources.swap_remove(index))
        }
        None => {
            error!("No touchpad found among available devices");
            None
        }
    }
}
