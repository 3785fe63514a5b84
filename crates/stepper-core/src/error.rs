//! Error types.
//!
//! Plain enums, no `thiserror` — this crate stays dependency-light the way
//! `motion::errors::PlannerError` does; `thiserror` in this workspace is
//! reserved for host-side application crates.

/// Recoverable and protocol-violation errors from [`crate::prep::PrepSink::prep_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepError {
    /// `prep_line` was called while the prep buffer was owned by the loader.
    /// Indicates an upstream scheduling bug.
    InternalError,
    /// `microseconds` was below `Config::epsilon_us`.
    MinTimeMove,
    /// `microseconds` was not finite (NaN or infinite).
    MinLengthMove,
}

/// Reported out-of-band when a `magic_start` sentinel mismatch is detected.
/// Recovery is a full re-init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionError {
    /// The runtime (`st`) sentinel no longer matches.
    Runtime,
    /// The prep (`sps`) sentinel no longer matches.
    Prep,
}
