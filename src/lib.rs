//! threefinger: three-finger touchpad drag emulation.
//!
//! Reads raw multi-touch events from a touchpad and turns a three-finger touch into a
//! held primary button: while three (or more) fingers stay down, finger motion moves the
//! pointer; lifting below three releases the button.
//!
//! The pieces, leaf first:
//! - [`selector`] picks the touchpad among the enumerated [`InputSource`]s
//! - [`calibration`] reads its advisory axis ranges
//! - [`gesture`] runs the state machine over the event stream
//! - [`motion`] turns absolute samples into scaled pointer moves
//! - [`pointer`] is the pointer-control sink
//!
//! [`daemon`] wires them into a process.

pub mod backends;
pub mod calibration;
pub mod config;
pub mod daemon;
pub mod device;
pub mod error;
pub mod event;
pub mod gesture;
pub mod logger;
pub mod metadata;
pub mod motion;
pub mod pointer;
pub mod selector;

pub use device::*;
pub use error::*;
pub use event::*;
pub use gesture::{GestureMachine, GestureState, Transition};
pub use pointer::PointerSink;
