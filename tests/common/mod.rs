#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use threefinger::error::PointerError;
use threefinger::pointer::{Clock, PointerSink};

/// Everything the core did to the outside world, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Sleep(Duration),
    Press,
    Release,
    Position,
    SetPosition(i32, i32),
}

#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<Call>>>);

impl Log {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Calls that change the desktop (no reads, no sleeps).
    pub fn actions(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Press | Call::Release | Call::SetPosition(..)))
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn writes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::SetPosition(..)))
            .count()
    }
}

pub struct RecordingPointer {
    log: Log,
    at: (i32, i32),
    failing_writes: u32,
}

impl RecordingPointer {
    pub fn new(log: &Log, at: (i32, i32)) -> Self {
        Self {
            log: log.clone(),
            at,
            failing_writes: 0,
        }
    }

    /// The next `n` `set_position` calls fail.
    pub fn failing_writes(mut self, n: u32) -> Self {
        self.failing_writes = n;
        self
    }
}

impl PointerSink for RecordingPointer {
    fn press_button(&mut self) -> Result<(), PointerError> {
        self.log.push(Call::Press);
        Ok(())
    }

    fn release_button(&mut self) -> Result<(), PointerError> {
        self.log.push(Call::Release);
        Ok(())
    }

    fn position(&mut self) -> Result<(i32, i32), PointerError> {
        self.log.push(Call::Position);
        Ok(self.at)
    }

    fn set_position(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(PointerError::Input("display went away".into()));
        }
        self.log.push(Call::SetPosition(x, y));
        self.at = (x, y);
        Ok(())
    }
}

/// Records sleeps instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingClock(pub Log);

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) {
        self.0.push(Call::Sleep(duration));
    }
}
