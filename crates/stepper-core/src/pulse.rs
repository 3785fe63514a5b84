//! DDA Pulse Generator.
//!
//! Runs at the highest interrupt priority on the fixed-period DDA timer.
//! The hot loop is two unrolled per-motor bodies rather than a `for m in
//! Motor::ALL` loop, matching the "fixed-axis unroll" design note: on a
//! two-motor machine the compiler unrolls either form identically, but the
//! explicit form keeps the ISR's two branches visible at the call site the
//! way the source's hand-unrolled Z/R code is.

use crate::engine::StepperCore;
use crate::hal::{Hal, StepPin};
use crate::planner::{MotionController, Planner};

impl<H, P, C> StepperCore<H, P, C>
where
    H: Hal,
    P: Planner,
    C: MotionController,
{
    /// The DDA timer's interrupt handler. Must be called once per tick at
    /// `Config::f_dda` Hz.
    pub fn pulse_tick(&mut self) {
        // --- Z motor ---
        {
            let motor = &mut self.runtime.motors[0];
            motor.phase_accumulator = motor.phase_accumulator.wrapping_add(motor.phase_increment);
            if motor.phase_accumulator > 0 {
                self.hal.step_z().pulse();
                motor.phase_accumulator -= self.runtime.dda_ticks_x_substeps;
                self.runtime.position[0] = if self.last_dir[0] {
                    self.runtime.position[0].wrapping_sub(1)
                } else {
                    self.runtime.position[0].wrapping_add(1)
                };
            }
        }
        // --- R motor ---
        {
            let motor = &mut self.runtime.motors[1];
            motor.phase_accumulator = motor.phase_accumulator.wrapping_add(motor.phase_increment);
            if motor.phase_accumulator > 0 {
                self.hal.step_r().pulse();
                motor.phase_accumulator -= self.runtime.dda_ticks_x_substeps;
                self.runtime.position[1] = if self.last_dir[1] {
                    self.runtime.position[1].wrapping_sub(1)
                } else {
                    self.runtime.position[1].wrapping_add(1)
                };
            }
        }

        self.runtime.dda_ticks_downcount -= 1;
        if self.runtime.dda_ticks_downcount == 0 {
            self.hal.timer().stop();
            // Same interrupt level: safe to chain directly into the loader
            // rather than pending a separate interrupt.
            self.request_load_move();
        }
    }
}
