//! Upstream planner stub.
//!
//! Full velocity profiling and junction deviation are explicitly out of
//! scope for this workspace: this crate exposes only an `exec_move()` entry
//! that fills a prepared buffer. `LinearMotionPlanner` is that thin
//! collaborator: it holds a FIFO of already-profiled constant-velocity
//! segments and turns each into exactly one `prep_line`/`prep_null` call
//! when `stepper_core::StepperCore` invokes `exec_move`.

use heapless::Deque;

use crate::errors::PlannerError;
use crate::kinematics::{Kinematics, AXES};
use stepper_core::{ExecMoveResult, Planner, PrepSink, MOTORS};

/// Depth of the lookahead queue between the foreground (gcode/host layer)
/// and the exec software interrupt.
const QUEUE_DEPTH: usize = 32;

/// One already-profiled constant-velocity segment, ready for the DDA core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedMove {
    /// Joint travel in length units, passed through the kinematics mapper.
    pub travel: [f64; AXES],
    pub directions: [bool; MOTORS],
    pub microseconds: f64,
}

/// A FIFO-backed `Planner` that maps queued [`PreparedMove`]s through a
/// [`Kinematics`] model and feeds them to the preparer one at a time.
pub struct LinearMotionPlanner<K: Kinematics> {
    kinematics: K,
    queue: Deque<PreparedMove, QUEUE_DEPTH>,
}

impl<K: Kinematics> LinearMotionPlanner<K> {
    pub fn new(kinematics: K) -> Self {
        Self {
            kinematics,
            queue: Deque::new(),
        }
    }

    /// Enqueues one segment for later preparation. Called from the
    /// foreground (e.g. after a gcode line is profiled upstream of this
    /// crate's scope).
    pub fn enqueue(&mut self, mv: PreparedMove) -> Result<(), PlannerError> {
        self.queue.push_back(mv).map_err(|_| PlannerError::QueueFull)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<K: Kinematics> Planner for LinearMotionPlanner<K> {
    fn exec_move(&mut self, mut sink: PrepSink<'_>) -> ExecMoveResult {
        let Some(mv) = self.queue.pop_front() else {
            return ExecMoveResult::Noop;
        };

        let (steps, microseconds) = self.kinematics.map(mv.travel, mv.microseconds);
        if sink.prep_line(steps, mv.directions, microseconds).is_err() {
            // Recoverable: drop the bad segment but keep the pipeline
            // cadence intact with a no-op segment rather than stalling the
            // loader.
            sink.prep_null();
        }
        ExecMoveResult::Ok
    }
}
