//! The planner/controller trait boundary this core sits downstream of.
//!
//! Motion planning itself (velocity profiling, junction deviation) is out of
//! scope for this crate; these traits only describe the two calls the core
//! makes back out into its environment.

use crate::prep::PrepSink;

/// Result of one `exec_move` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMoveResult {
    /// The planner prepared a segment (via `prep_line` or `prep_null`).
    Ok,
    /// The planner had nothing to prepare (its own queue is empty).
    Noop,
}

/// Implemented by the upstream motion planner. `exec_move` is invoked from
/// the exec software interrupt and is expected to call `prep_line` or
/// `prep_null` on the supplied [`PrepSink`] synchronously before returning.
pub trait Planner {
    fn exec_move(&mut self, sink: PrepSink<'_>) -> ExecMoveResult;
}

/// Implemented by the enclosing motor controller. `motion_complete` is
/// called exactly once each time the pipeline drains and finds no further
/// segment prepared.
pub trait MotionController {
    fn motion_complete(&mut self);
}
