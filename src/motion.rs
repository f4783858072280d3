//! Absolute-to-relative motion translation.
//!
//! Touchpad samples arrive one axis at a time. Once both axes have a fresh sample the
//! translator closes a cycle: it computes the scaled delta against the previous pair,
//! moves the pointer if a drag is in progress and the delta clears the jitter threshold,
//! and then records the new pair as the baseline. The baseline is updated on every
//! cycle, dragging or not, so a drag starts from the finger's current position.
//!
//! Motion is applied relative to the pointer's live position: read it, add the rounded
//! delta, write it back.

use crate::config::{DEFAULT_SCALE, JITTER_THRESHOLD};
use crate::error::PointerError;
use crate::event::Axis;
use crate::gesture::GestureState;
use crate::pointer::PointerSink;

/// Result of feeding one axis sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionOutcome {
    /// Waiting for the other axis.
    Pending,
    /// Cycle closed while not dragging; baseline updated.
    Idle,
    /// Cycle closed during a drag, but no earlier pair existed to measure against.
    Baseline,
    /// Cycle closed during a drag; delta below the jitter threshold.
    Suppressed,
    /// Pointer moved by the given rounded delta.
    Moved { dx: i32, dy: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTranslator {
    scale: f64,
    jitter_threshold: f64,
}

impl Default for MotionTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE, JITTER_THRESHOLD)
    }
}

impl MotionTranslator {
    pub fn new(scale: f64, jitter_threshold: f64) -> Self {
        Self {
            scale,
            jitter_threshold,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scaled, unrounded displacement between two absolute samples.
    pub fn scaled_delta(&self, from: (i32, i32), to: (i32, i32)) -> (f64, f64) {
        let dx = (f64::from(to.0) - f64::from(from.0)) * self.scale;
        let dy = (f64::from(to.1) - f64::from(from.1)) * self.scale;
        (dx, dy)
    }

    /// Whether a scaled delta is large enough to move the pointer.
    pub fn clears_jitter(&self, dx: f64, dy: f64) -> bool {
        dx.abs() > self.jitter_threshold || dy.abs() > self.jitter_threshold
    }

    /// Record one absolute sample and, when a pair is complete, translate it.
    ///
    /// On a pointer error the cycle has still been closed (baseline updated, freshness
    /// flags cleared); only the pointer move is lost.
    pub fn on_axis_sample(
        &self,
        axis: Axis,
        value: i32,
        state: &mut GestureState,
        sink: &mut dyn PointerSink,
    ) -> Result<MotionOutcome, PointerError> {
        match axis {
            Axis::X => {
                state.abs_x = value;
                state.have_x = true;
            }
            Axis::Y => {
                state.abs_y = value;
                state.have_y = true;
            }
        }
        if !(state.have_x && state.have_y) {
            return Ok(MotionOutcome::Pending);
        }

        let current = (state.abs_x, state.abs_y);
        let (dx, dy) = self.scaled_delta((state.last_x, state.last_y), current);
        let had_baseline = state.has_baseline;

        state.last_x = current.0;
        state.last_y = current.1;
        state.have_x = false;
        state.have_y = false;
        state.has_baseline = true;

        if !state.is_dragging() {
            return Ok(MotionOutcome::Idle);
        }
        if !had_baseline {
            return Ok(MotionOutcome::Baseline);
        }
        if !self.clears_jitter(dx, dy) {
            return Ok(MotionOutcome::Suppressed);
        }

        let (dx, dy) = (dx.round() as i32, dy.round() as i32);
        let (x, y) = sink.position()?;
        sink.set_position(x.saturating_add(dx), y.saturating_add(dy))?;
        Ok(MotionOutcome::Moved { dx, dy })
    }
}
