use crate::error::SourceError;
use crate::event::{RawEvent, ABS_MT_TRACKING_ID, ABS_X, ABS_Y, TRACKING_ID_RELEASED};
use crate::metadata::{Capabilities, DeviceMeta};
use crate::InputSource;
use std::collections::VecDeque;

enum Step {
    Event(RawEvent),
    Fail(std::io::ErrorKind),
}

/// Scripted input source.
///
/// Queued events are handed out one per `read_events` call; once the queue is drained
/// the source reports [`SourceError::Closed`].
pub struct VirtualSource {
    meta: DeviceMeta,
    steps: VecDeque<Step>,
    next_tracking_id: i32,
}

impl VirtualSource {
    pub fn new(id: &str, name: &str) -> Self {
        Self::with_meta(DeviceMeta::new(name, id))
    }

    pub fn with_meta(meta: DeviceMeta) -> Self {
        Self {
            meta,
            steps: VecDeque::new(),
            next_tracking_id: 0,
        }
    }

    /// A virtual touchpad declaring X/Y absolute axes with the given maxima.
    pub fn touchpad(x_max: i32, y_max: i32) -> Self {
        Self::with_meta(
            DeviceMeta::new("Virtual Touchpad", "virtual:0")
                .with_capabilities(Capabilities::absolute([(ABS_X, 0, x_max), (ABS_Y, 0, y_max)])),
        )
    }

    /// Inject a raw input event.
    pub fn feed(&mut self, event: RawEvent) -> &mut Self {
        self.steps.push_back(Step::Event(event));
        self
    }

    /// A new finger touches down.
    pub fn contact(&mut self) -> &mut Self {
        let id = self.next_tracking_id;
        self.next_tracking_id += 1;
        self.feed(RawEvent::abs(ABS_MT_TRACKING_ID, id))
    }

    /// A finger lifts.
    pub fn lift(&mut self) -> &mut Self {
        self.feed(RawEvent::abs(ABS_MT_TRACKING_ID, TRACKING_ID_RELEASED))
    }

    pub fn x(&mut self, value: i32) -> &mut Self {
        self.feed(RawEvent::abs(ABS_X, value))
    }

    pub fn y(&mut self, value: i32) -> &mut Self {
        self.feed(RawEvent::abs(ABS_Y, value))
    }

    /// Next read fails with an I/O error of `kind` (device unplugged, permission revoked).
    pub fn fail(&mut self, kind: std::io::ErrorKind) -> &mut Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    pub fn pending(&self) -> usize {
        self.steps.len()
    }
}

impl InputSource for VirtualSource {
    fn read_events(&mut self) -> Result<Vec<RawEvent>, SourceError> {
        match self.steps.pop_front() {
            Some(Step::Event(event)) => Ok(vec![event]),
            Some(Step::Fail(kind)) => Err(SourceError::Io(kind.into())),
            None => Err(SourceError::Closed),
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_then_closes() {
        let mut src = VirtualSource::touchpad(100, 100);
        src.contact().x(5).lift();
        assert_eq!(src.pending(), 3);

        assert_eq!(
            src.read_events().unwrap(),
            vec![RawEvent::abs(ABS_MT_TRACKING_ID, 0)]
        );
        assert_eq!(src.read_events().unwrap(), vec![RawEvent::abs(ABS_X, 5)]);
        assert_eq!(
            src.read_events().unwrap(),
            vec![RawEvent::abs(ABS_MT_TRACKING_ID, -1)]
        );
        assert!(matches!(src.read_events(), Err(SourceError::Closed)));
    }

    #[test]
    fn scripted_failure_is_an_io_error() {
        let mut src = VirtualSource::new("virtual:1", "Broken");
        src.fail(std::io::ErrorKind::NotFound);
        match src.read_events() {
            Err(SourceError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn tracking_ids_are_distinct() {
        let mut src = VirtualSource::touchpad(1, 1);
        src.contact().contact();
        let a = src.read_events().unwrap()[0];
        let b = src.read_events().unwrap()[0];
        assert_ne!(a.value, b.value);
    }
}
