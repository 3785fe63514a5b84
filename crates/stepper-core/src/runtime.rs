//! Runtime (`st`) state: owned exclusively by the DDA pulse generator, with
//! the single exception of the loader, which may write it while
//! `dda_ticks_downcount == 0` (the DDA timer is disabled at that point, so
//! there is no concurrent writer).

/// The core is trimmed to a Z/R two-axis machine. Kept as a named constant,
/// rather than a const generic on every type in this crate,
/// per the "fixed-axis unroll" design note: the hot ISR path indexes fixed
/// 2-element arrays so the compiler can unroll the per-motor loop.
pub const MOTORS: usize = 2;

/// Identifies one of the two physical stepper motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motor {
    Z,
    R,
}

impl Motor {
    /// Both motors, in array-index order.
    pub const ALL: [Motor; MOTORS] = [Motor::Z, Motor::R];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Motor::Z => 0,
            Motor::R => 1,
        }
    }
}

/// Per-motor DDA state: a Bresenham phase accumulator and its per-tick
/// addend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotorRuntime {
    /// Added to the accumulator every tick. Non-negative: direction is
    /// handled separately via the direction pin.
    pub phase_increment: i32,
    /// Bresenham-style running error term.
    pub phase_accumulator: i32,
}

/// The live DDA state.
///
/// Carries a `magic_start` sentinel: any reader observing a value other than
/// the configured magic number reports memory corruption rather than
/// trusting the rest of the struct.
#[derive(Debug, Clone, Copy)]
pub struct Runtime {
    pub(crate) magic_start: u32,
    /// Decremented once per DDA tick; the segment ends at zero.
    pub dda_ticks_downcount: i32,
    /// `dda_ticks * SUBSTEPS` for the running segment — the amount
    /// subtracted from a motor's accumulator when it steps.
    pub dda_ticks_x_substeps: i32,
    pub motors: [MotorRuntime; MOTORS],
    /// Net step position per motor. Written by the DDA ISR, read by
    /// foreground diagnostics only.
    pub(crate) position: [i32; MOTORS],
}

impl Runtime {
    pub(crate) const fn new(magic: u32) -> Self {
        Self {
            magic_start: magic,
            dda_ticks_downcount: 0,
            dda_ticks_x_substeps: 0,
            motors: [MotorRuntime {
                phase_increment: 0,
                phase_accumulator: 0,
            }; MOTORS],
            position: [0; MOTORS],
        }
    }

    #[inline]
    pub(crate) fn magic_ok(&self, magic: u32) -> bool {
        self.magic_start == magic
    }
}

/// The two-valued ownership handshake for the prep buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExecOwner {
    /// The preparer may write the prep buffer.
    Exec = 0,
    /// The loader may read the prep buffer.
    Loader = 1,
}

impl ExecOwner {
    #[inline]
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => ExecOwner::Exec,
            _ => ExecOwner::Loader,
        }
    }
}
