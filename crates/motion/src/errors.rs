//! Error types for the motion planning crate.

/// Errors the upstream planner surface can raise. Recoverable: callers may
/// retry with a later segment.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlannerError {
    /// The planner's lookahead queue is full and cannot accept new moves.
    QueueFull,
}
