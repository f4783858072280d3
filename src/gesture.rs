//! Three-finger drag state machine.
//!
//! [`GestureMachine`] consumes raw events one at a time, in stream order, and drives the
//! pointer sink:
//!
//! - `IDLE -> DRAGGING` the moment the finger count becomes exactly 3: wait the press
//!   delay, press the primary button, snapshot the current absolute position as the
//!   motion baseline.
//! - `DRAGGING -> IDLE` the moment the count drops below 3: release the button if it is
//!   held.
//! - Four or more fingers keep an active drag going; they never re-press.
//!
//! Axis samples go to the [`MotionTranslator`]. A failed pointer call is reported as a
//! [`GestureError`] after the state has been updated; [`run`] logs it and keeps reading.

use crate::calibration::AxisRangeTable;
use crate::config::Settings;
use crate::device::InputSource;
use crate::error::{GestureError, SourceError};
use crate::event::{RawEvent, TouchEvent};
use crate::motion::{MotionOutcome, MotionTranslator};
use crate::pointer::{Clock, PointerSink, SystemClock};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Fingers required to start a drag.
pub const DRAG_FINGERS: u32 = 3;

/// Mutable session state, owned by the worker that reads the stream.
///
/// Invariant: `button_pressed` implies `three_fingers_active`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GestureState {
    pub finger_count: u32,
    pub three_fingers_active: bool,
    pub button_pressed: bool,
    /// Most recent absolute sample per axis.
    pub abs_x: i32,
    pub abs_y: i32,
    /// Motion baseline: the last completed sample pair.
    pub last_x: i32,
    pub last_y: i32,
    /// Fresh sample seen for the axis in the current cycle.
    pub have_x: bool,
    pub have_y: bool,
    /// `last_x/last_y` hold a real sample pair.
    pub has_baseline: bool,
}

impl GestureState {
    pub fn is_dragging(&self) -> bool {
        self.three_fingers_active && self.button_pressed
    }
}

/// What one event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Event type/code not interpreted.
    Ignored,
    /// Finger count changed without crossing the drag threshold.
    Fingers { count: u32 },
    /// Drag started; button pressed.
    Pressed,
    /// Drag ended; button released (or was not held).
    Released,
    Motion(MotionOutcome),
}

pub struct GestureMachine {
    state: GestureState,
    translator: MotionTranslator,
    ranges: AxisRangeTable,
    press_delay: Duration,
    clock: Box<dyn Clock>,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(&Settings::default(), AxisRangeTable::default())
    }
}

impl GestureMachine {
    pub fn new(settings: &Settings, ranges: AxisRangeTable) -> Self {
        Self {
            state: GestureState::default(),
            translator: MotionTranslator::new(settings.scale, settings.jitter_threshold),
            ranges,
            press_delay: settings.press_delay,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for the press delay.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_translator(mut self, translator: MotionTranslator) -> Self {
        self.translator = translator;
        self
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Process a single event.
    pub fn handle(
        &mut self,
        event: &RawEvent,
        sink: &mut dyn PointerSink,
    ) -> Result<Transition, GestureError> {
        let Some(touch) = event.decode() else {
            return Ok(Transition::Ignored);
        };
        trace!(?touch, "touch event");

        match touch {
            TouchEvent::Contact { .. } => {
                self.state.finger_count += 1;
                self.update_gesture(sink)
            }
            TouchEvent::Lift => {
                self.state.finger_count = self.state.finger_count.saturating_sub(1);
                self.update_gesture(sink)
            }
            TouchEvent::Axis { axis, value } => {
                if !self.ranges.contains(axis, value) {
                    debug!(
                        ?axis,
                        value,
                        range = ?self.ranges.range(axis),
                        "sample outside declared axis range"
                    );
                }
                self.translator
                    .on_axis_sample(axis, value, &mut self.state, sink)
                    .map(Transition::Motion)
                    .map_err(GestureError::Move)
            }
        }
    }

    fn update_gesture(&mut self, sink: &mut dyn PointerSink) -> Result<Transition, GestureError> {
        let count = self.state.finger_count;

        if count == DRAG_FINGERS && !self.state.three_fingers_active {
            info!("Three fingers detected");
            self.state.three_fingers_active = true;
            self.clock.sleep(self.press_delay);
            sink.press_button().map_err(GestureError::Press)?;
            self.state.button_pressed = true;
            self.state.last_x = self.state.abs_x;
            self.state.last_y = self.state.abs_y;
            return Ok(Transition::Pressed);
        }

        if count < DRAG_FINGERS && self.state.three_fingers_active {
            info!("Fingers lifted");
            self.state.three_fingers_active = false;
            if self.state.button_pressed {
                // Cleared even if the release fails so the state never records a
                // held button outside a drag.
                self.state.button_pressed = false;
                sink.release_button().map_err(GestureError::Release)?;
            }
            return Ok(Transition::Released);
        }

        Ok(Transition::Fingers { count })
    }
}

/// How the read loop ended.
#[derive(Debug)]
pub enum StreamEnd {
    /// Source reached end of stream.
    Closed,
    /// Source read failed; not retried.
    Failed(SourceError),
}

/// Counters for one read-loop session.
#[derive(Debug)]
pub struct SessionSummary {
    pub events: u64,
    pub ignored: u64,
    pub failed: u64,
    pub presses: u64,
    pub releases: u64,
    pub moves: u64,
    pub end: StreamEnd,
}

/// Blocking read loop: feed every event from `source` through `machine` until the
/// stream ends.
///
/// Per-event failures are logged and skipped. A read failure ends the session and is
/// reported in [`SessionSummary::end`].
pub fn run(
    source: &mut dyn InputSource,
    sink: &mut dyn PointerSink,
    machine: &mut GestureMachine,
) -> SessionSummary {
    info!("Listening to device: {}", source.name());

    let mut summary = SessionSummary {
        events: 0,
        ignored: 0,
        failed: 0,
        presses: 0,
        releases: 0,
        moves: 0,
        end: StreamEnd::Closed,
    };

    loop {
        let batch = match source.read_events() {
            Ok(batch) => batch,
            Err(SourceError::Closed) => {
                info!("Input source {} closed", source.id());
                break;
            }
            Err(e) => {
                warn!("Input source {} failed: {}", source.id(), e);
                summary.end = StreamEnd::Failed(e);
                break;
            }
        };

        for event in &batch {
            summary.events += 1;
            match machine.handle(event, sink) {
                Ok(Transition::Ignored) => summary.ignored += 1,
                Ok(Transition::Pressed) => summary.presses += 1,
                Ok(Transition::Released) => summary.releases += 1,
                Ok(Transition::Motion(MotionOutcome::Moved { .. })) => summary.moves += 1,
                Ok(_) => {}
                Err(e) => {
                    summary.failed += 1;
                    warn!("Error handling {:?}: {}", event, e);
                }
            }
        }
    }

    info!(
        events = summary.events,
        presses = summary.presses,
        releases = summary.releases,
        moves = summary.moves,
        failed = summary.failed,
        "read loop finished"
    );
    summary
}
