//! # Deterministic Host Harness
//!
//! Drives `stepper_core`'s DDA pipeline in-process for CI and bring-up
//! testing, without a wire protocol or physical hardware to simulate: the
//! pipeline has no socket to speak to, so this calls straight into
//! `StepperCore` and records every pulse, direction write, timer arm, and
//! interrupt pend to a [`TraceEntry`] log that can be diffed against a
//! golden trace.

pub mod harness;
pub mod trace_hal;

pub use harness::SimHost;
pub use trace_hal::{TraceEntry, TraceEvent, TraceMotor};
