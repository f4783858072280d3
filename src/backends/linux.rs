//! Linux evdev backend.
//!
//! - Enumerate `/dev/input/event*` nodes readable by this process via `evdev::enumerate`
//! - Snapshot each device's name, path, event types and absolute-axis ranges as [`DeviceMeta`]
//! - Wrap each device as an [`EvdevSource`] whose `read_events` blocks in `fetch_events`
//!
//! Nodes the process cannot open are skipped silently by `evdev::enumerate`; running
//! without root usually means seeing no touchpad at all.

#![cfg(all(feature = "evdev", target_os = "linux"))]

use crate::device::InputSource;
use crate::error::SourceError;
use crate::event::{RawEvent, EV_ABS};
use crate::metadata::{AbsAxisInfo, Capabilities, DeviceMeta};
use evdev::Device;
use std::path::Path;
use tracing::warn;

/// An opened evdev device node.
pub struct EvdevSource {
    raw: Device,
    meta: DeviceMeta,
}

impl EvdevSource {
    pub fn new(path: &Path, raw: Device) -> Self {
        let meta = meta(path, &raw);
        Self { raw, meta }
    }

    /// Open a single device node directly.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = Device::open(path)?;
        Ok(Self::new(path, raw))
    }
}

impl InputSource for EvdevSource {
    /// Block until the kernel has events, then return the whole synced batch.
    ///
    /// `ENODEV` (device unplugged) surfaces as [`SourceError::Io`]; evdev nodes do not
    /// report a clean end of stream.
    fn read_events(&mut self) -> Result<Vec<RawEvent>, SourceError> {
        let events = self
            .raw
            .fetch_events()?
            .map(|ev| RawEvent::new(ev.event_type().0, ev.code(), ev.value()))
            .collect();
        Ok(events)
    }

    fn name(&self) -> &str {
        &self.meta.name
    }

    fn id(&self) -> &str {
        &self.meta.path
    }

    fn metadata(&self) -> DeviceMeta {
        self.meta.clone()
    }
}

fn capabilities(path: &Path, raw: &Device) -> Capabilities {
    let mut caps = Capabilities {
        event_types: raw.supported_events().iter().map(|t| t.0).collect(),
        ..Capabilities::default()
    };

    if caps.supports(EV_ABS) {
        match raw.get_absinfo() {
            Ok(axes) => {
                for (code, info) in axes {
                    caps.abs_axes.insert(
                        code.0,
                        AbsAxisInfo {
                            minimum: info.minimum(),
                            maximum: info.maximum(),
                        },
                    );
                }
            }
            Err(e) => warn!("Reading axis info of {} failed: {}", path.display(), e),
        }
    }
    caps
}

/// Build a [`DeviceMeta`] snapshot for an evdev device.
fn meta(path: &Path, raw: &Device) -> DeviceMeta {
    DeviceMeta {
        name: raw.name().unwrap_or("Unknown").to_string(),
        path: path.display().to_string(),
        capabilities: capabilities(path, raw),
    }
}

/// Enumerate every readable evdev device and wrap it as an [`InputSource`].
pub fn probe_devices() -> Vec<Box<dyn InputSource>> {
    evdev::enumerate()
        .map(|(path, raw)| Box::new(EvdevSource::new(&path, raw)) as Box<dyn InputSource>)
        .collect()
}
