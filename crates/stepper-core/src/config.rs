//! Compile-time configuration constants.
//!
//! In the embedded build these values are fixed for a given board; they are
//! kept as plain (non-`static`) struct fields here, passed into the
//! constructor rather than buried in module-level consts, so host-side
//! tests can exercise multiple DDA frequencies and substep factors in one
//! binary.

use crate::runtime::MOTORS;

/// Tuning and identity constants for one [`crate::StepperCore`] instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// DDA tick frequency, in Hz.
    pub f_dda: u32,
    /// Fractional-step scaling factor applied in the preparer.
    pub substeps: u32,
    /// Ratio threshold for the anti-stall accumulator reset.
    pub accumulator_reset_factor: u32,
    /// XOR mask applied to the commanded direction for each motor.
    pub motor_polarity: [bool; MOTORS],
    /// Length-unit-to-step scale for each motor.
    pub pulses_per_unit: [f64; MOTORS],
    /// Minimum accepted segment duration, in microseconds.
    pub epsilon_us: f64,
    /// Sentinel word stored in `magic_start` fields.
    pub magic: u32,
}

impl Config {
    /// Constructs a `Config`. Kept `const fn` so embedded boards can build
    /// theirs as a `static`/`const`.
    pub const fn new(
        f_dda: u32,
        substeps: u32,
        accumulator_reset_factor: u32,
        motor_polarity: [bool; MOTORS],
        pulses_per_unit: [f64; MOTORS],
        epsilon_us: f64,
        magic: u32,
    ) -> Self {
        Self {
            f_dda,
            substeps,
            accumulator_reset_factor,
            motor_polarity,
            pulses_per_unit,
            epsilon_us,
            magic,
        }
    }
}
