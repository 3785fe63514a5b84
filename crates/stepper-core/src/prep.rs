//! Segment Preparer and the `sps` staging buffer.
//!
//! The `move_type` integer + `prep_state` boolean pair is replaced with a
//! tagged `MoveKind`: there is no representable state where `prep_state` is
//! true but the move parameters are uninitialized.

use crate::config::Config;
use crate::error::PrepError;
use crate::runtime::{ExecOwner, Motor, MOTORS};
use core::sync::atomic::{AtomicU8, Ordering};

/// Per-motor parameters computed by the preparer for one `ALINE` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepMotor {
    /// `round(|steps| * SUBSTEPS)`.
    pub phase_increment: u32,
    /// Commanded direction after XOR with the configured motor polarity.
    /// `false` = forward, `true` = reverse.
    pub dir: bool,
}

/// Precomputed integer DDA parameters for one `ALINE` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlineParams {
    pub dda_ticks: u32,
    pub dda_ticks_x_substeps: u32,
    /// True iff this segment ran much slower than the previous one; tells
    /// the loader to reinitialize accumulators instead of leaving residuals.
    pub reset_flag: bool,
    pub motors: [PrepMotor; MOTORS],
}

/// The tagged variant replacing `move_type` + `prep_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Nothing prepared yet (or already consumed by the loader).
    Empty,
    /// A normal step-emitting segment.
    Aline(AlineParams),
    /// A no-op used for M-codes and dwell placeholders.
    Null,
}

/// The `sps` staging struct, owned alternately by preparer and loader.
#[derive(Debug, Clone, Copy)]
pub struct Prep {
    pub(crate) magic_start: u32,
    pub(crate) move_kind: MoveKind,
    /// Duration of the previous segment in DDA ticks, used to compute
    /// `reset_flag`. Never reset on init, so the first segment's heuristic
    /// compares against zero and never trips — replicated deliberately,
    /// see DESIGN.md.
    pub(crate) prev_ticks: u32,
}

impl Prep {
    pub(crate) const fn new(magic: u32) -> Self {
        Self {
            magic_start: magic,
            move_kind: MoveKind::Empty,
            prev_ticks: 0,
        }
    }

    #[inline]
    pub(crate) fn magic_ok(&self, magic: u32) -> bool {
        self.magic_start == magic
    }

    /// Takes the prepared move, leaving `Empty` behind. Called by the loader
    /// once it has observed `exec_state == OWNED_BY_LOADER`.
    pub(crate) fn take_move_kind(&mut self) -> MoveKind {
        core::mem::replace(&mut self.move_kind, MoveKind::Empty)
    }

    /// Forces the buffer back to `Empty` without touching `prev_ticks`,
    /// for `StepperCore::halt`.
    pub(crate) fn move_kind_mut_for_halt(&mut self) {
        self.move_kind = MoveKind::Empty;
    }
}

/// Rounds a non-negative float to the nearest `u32`, saturating. Avoids a
/// dependency on `f64::round` (unavailable in `core` without `libm`) by
/// adding a half-unit bias before truncating.
pub(crate) fn round_to_u32(x: f64) -> u32 {
    if x <= 0.0 {
        0
    } else if x >= u32::MAX as f64 {
        u32::MAX
    } else {
        (x + 0.5) as u32
    }
}

/// A borrowed handle onto the prep buffer, granted only while `exec_state ==
/// OWNED_BY_EXEC`. This is the capability the planner's `exec_move`
/// implementation calls `prep_line`/`prep_null` through.
pub struct PrepSink<'a> {
    pub(crate) prep: &'a mut Prep,
    pub(crate) exec_state: &'a AtomicU8,
    pub(crate) config: &'a Config,
}

impl<'a> PrepSink<'a> {
    /// Converts one planner segment into DDA parameters.
    ///
    /// Preconditions: `exec_state == OWNED_BY_EXEC`, `microseconds` finite
    /// and `>= Config::epsilon_us`.
    pub fn prep_line(
        &mut self,
        steps: [f64; MOTORS],
        directions: [bool; MOTORS],
        microseconds: f64,
    ) -> Result<(), PrepError> {
        if ExecOwner::from_u8(self.exec_state.load(Ordering::Acquire)) != ExecOwner::Exec {
            crate::diag::prep_rejected(PrepError::InternalError);
            return Err(PrepError::InternalError);
        }
        if !microseconds.is_finite() {
            crate::diag::prep_rejected(PrepError::MinLengthMove);
            return Err(PrepError::MinLengthMove);
        }
        if microseconds < self.config.epsilon_us {
            crate::diag::prep_rejected(PrepError::MinTimeMove);
            return Err(PrepError::MinTimeMove);
        }

        let dda_ticks = round_to_u32((microseconds / 1_000_000.0) * self.config.f_dda as f64);
        if dda_ticks == 0 {
            // Rounds below one tick even though it cleared the epsilon floor
            // (e.g. a 1us move at F_DDA=50_000): loading this would arm the
            // runtime with dda_ticks_downcount == 0, and the pulse ISR's
            // end-of-segment check (== 0, reached only by decrementing down
            // to it) would never fire again, hanging the pipeline. Reject it
            // the same as a too-short move instead.
            crate::diag::prep_rejected(PrepError::MinTimeMove);
            return Err(PrepError::MinTimeMove);
        }
        let dda_ticks_x_substeps = dda_ticks.saturating_mul(self.config.substeps);

        let mut motors = [PrepMotor::default(); MOTORS];
        for m in Motor::ALL {
            let i = m.index();
            let dir = directions[i] ^ self.config.motor_polarity[i];
            let phase_increment =
                round_to_u32(steps[i].abs() * self.config.substeps as f64);
            motors[i] = PrepMotor { phase_increment, dir };
        }

        // Unsigned comparison: `dda_ticks * ACCUMULATOR_RESET_FACTOR <
        // prev_ticks`. Widen to u64 so the multiplication cannot itself wrap
        // and produce a false negative.
        let reset_flag = (dda_ticks as u64) * (self.config.accumulator_reset_factor as u64)
            < self.prep.prev_ticks as u64;

        self.prep.prev_ticks = dda_ticks;
        self.prep.move_kind = MoveKind::Aline(AlineParams {
            dda_ticks,
            dda_ticks_x_substeps,
            reset_flag,
            motors,
        });

        Ok(())
    }

    /// Unconditionally marks the buffer as holding a no-op segment. Used to
    /// keep the pipeline cadence intact for M-codes and dwell placeholders.
    /// Always succeeds.
    pub fn prep_null(&mut self) {
        self.prep.move_kind = MoveKind::Null;
    }
}
