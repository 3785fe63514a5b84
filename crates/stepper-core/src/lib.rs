//! Triple-buffered DDA step-pulse generation core for a two-axis (Z, R)
//! motor controller.
//!
//! Three contexts share two small buffers (`Runtime`/`st` and `Prep`/`sps`)
//! through a single-bit ownership handshake (`ExecOwner`): the Segment
//! Preparer converts one planner move into integer DDA parameters, the
//! Segment Loader swaps those parameters into the live runtime and arms the
//! timer, and the DDA Pulse Generator ticks the runtime at a fixed hardware
//! rate, emitting step pulses via Bresenham-style accumulators. No context
//! blocks on another; the handshake means there is always at most one buffer
//! a given context may touch.
#![cfg_attr(not(feature = "std"), no_std)]

mod diag;
mod engine;
mod pulse;

pub mod config;
pub mod error;
pub mod hal;
pub mod planner;
pub mod prep;
pub mod runtime;

pub use config::Config;
pub use engine::StepperCore;
pub use error::{CorruptionError, PrepError};
pub use hal::{DdaTimer, DirPin, Hal, SoftInterrupt, StepPin};
pub use planner::{ExecMoveResult, MotionController, Planner};
pub use prep::{AlineParams, MoveKind, PrepMotor, PrepSink};
pub use runtime::{ExecOwner, Motor, MOTORS};
