//! `StepperCore`: owns the runtime and prep state, the `exec_state`
//! handshake, the hardware surface, and the planner/controller references.
//! Ties together the Preparer, Loader, and request protocol; the Pulse
//! Generator is implemented on this same type in `pulse.rs`.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config::Config;
use crate::diag;
use crate::error::CorruptionError;
use crate::hal::{DirPin, Hal, SoftInterrupt};
use crate::planner::{ExecMoveResult, MotionController, Planner};
use crate::prep::{MoveKind, Prep, PrepSink};
use crate::runtime::{ExecOwner, Motor, Runtime, MOTORS};

pub struct StepperCore<H, P, C>
where
    H: Hal,
    P: Planner,
    C: MotionController,
{
    pub(crate) runtime: Runtime,
    prep: Prep,
    exec_state: AtomicU8,
    /// Last direction written to each motor's direction pin, cached so the
    /// pulse ISR can turn a pulse into a signed position update without
    /// re-deriving it from the prep buffer it no longer owns.
    pub(crate) last_dir: [bool; MOTORS],
    /// Set once a loader drain has reported `motion_complete`, so repeated
    /// idempotent `request_load_move` calls don't re-signal it: it must fire
    /// exactly once per drain.
    motion_complete_signaled: bool,
    /// Latched once a sentinel mismatch has been reported, so repeated
    /// foreground polls of `check_integrity` don't re-log the same fault.
    fault_latched: AtomicBool,
    config: Config,
    pub(crate) hal: H,
    planner: P,
    controller: C,
}

impl<H, P, C> StepperCore<H, P, C>
where
    H: Hal,
    P: Planner,
    C: MotionController,
{
    /// `init(controller_ref)`: installs the hardware surface, planner and
    /// controller, sets the `magic_start` sentinels, and initializes
    /// `exec_state = OWNED_BY_EXEC` so the preparer may fill immediately.
    pub fn init(config: Config, hal: H, planner: P, controller: C) -> Self {
        Self {
            runtime: Runtime::new(config.magic),
            prep: Prep::new(config.magic),
            exec_state: AtomicU8::new(ExecOwner::Exec as u8),
            last_dir: [false; MOTORS],
            motion_complete_signaled: false,
            fault_latched: AtomicBool::new(false),
            config,
            hal,
            planner,
            controller,
        }
    }

    /// `is_busy()`: true iff the runtime still has ticks left to emit.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.runtime.dda_ticks_downcount != 0
    }

    /// Net step position of one motor, for foreground diagnostics. Reads
    /// under a critical section so a torn 32-bit read can't be observed on
    /// targets where it isn't naturally atomic.
    pub fn position(&self, motor: Motor) -> i32 {
        critical_section::with(|_cs| self.runtime.position[motor.index()])
    }

    /// The currently-armed segment's remaining tick count.
    pub fn dda_ticks_downcount(&self) -> i32 {
        self.runtime.dda_ticks_downcount
    }

    /// A motor's live Bresenham phase accumulator, for tests that need to
    /// observe the anti-stall reset directly rather than inferring it from
    /// pulse counts.
    pub fn phase_accumulator(&self, motor: Motor) -> i32 {
        self.runtime.motors[motor.index()].phase_accumulator
    }

    /// Verifies both `magic_start` sentinels. Call periodically from the
    /// foreground loop; a mismatch indicates memory corruption and should be
    /// treated as fatal. Logged exactly once: the first mismatch latches
    /// `fault_latched` via a swap, so repeated polls while the fault
    /// persists don't re-report it.
    pub fn check_integrity(&self) -> Result<(), CorruptionError> {
        if !self.runtime.magic_ok(self.config.magic) {
            if !self.fault_latched.swap(true, Ordering::AcqRel) {
                diag::corruption_detected(CorruptionError::Runtime);
            }
            return Err(CorruptionError::Runtime);
        }
        if !self.prep.magic_ok(self.config.magic) {
            if !self.fault_latched.swap(true, Ordering::AcqRel) {
                diag::corruption_detected(CorruptionError::Prep);
            }
            return Err(CorruptionError::Prep);
        }
        Ok(())
    }

    /// Foreground halt: disables the timer and returns the pipeline to its
    /// initial, idle state. There is
    /// no segment-level cancel; this is a full stop.
    pub fn halt(&mut self) {
        self.hal.timer().stop();
        self.runtime.dda_ticks_downcount = 0;
        self.prep.move_kind_mut_for_halt();
        self.exec_state.store(ExecOwner::Exec as u8, Ordering::Release);
        self.motion_complete_signaled = false;
    }

    /// Exec request: fires the preparer if the buffer is exec-owned.
    /// Idempotent no-op otherwise.
    pub fn request_exec_move(&mut self) {
        if ExecOwner::from_u8(self.exec_state.load(Ordering::Acquire)) != ExecOwner::Exec {
            return;
        }
        let sink = PrepSink {
            prep: &mut self.prep,
            exec_state: &self.exec_state,
            config: &self.config,
        };
        let result = self.planner.exec_move(sink);
        if result == ExecMoveResult::Ok {
            // The explicit ownership write happens here, in the preparer's
            // caller — `prep_line`/`prep_null` only set the move parameters.
            self.exec_state.store(ExecOwner::Loader as u8, Ordering::Release);
        }
    }

    /// Idempotent: any code path may call this to (re-)trigger the exec
    /// software interrupt rather than calling `request_exec_move` directly.
    pub fn pend_exec_request(&mut self) {
        self.hal.exec_irq().pend();
    }

    /// Load request: a no-op if the runtime is still
    /// busy or if no prepared segment is available. In the latter case,
    /// the system has reached motion complete.
    pub fn request_load_move(&mut self) {
        if self.runtime.dda_ticks_downcount != 0 {
            return;
        }
        if ExecOwner::from_u8(self.exec_state.load(Ordering::Acquire)) != ExecOwner::Loader {
            if !self.motion_complete_signaled {
                self.motion_complete_signaled = true;
                self.controller.motion_complete();
            }
            return;
        }
        self.motion_complete_signaled = false;

        match self.prep.take_move_kind() {
            MoveKind::Aline(params) => {
                self.runtime.dda_ticks_downcount = params.dda_ticks as i32;
                self.runtime.dda_ticks_x_substeps = params.dda_ticks_x_substeps as i32;

                for m in Motor::ALL {
                    let i = m.index();
                    let pm = params.motors[i];
                    self.runtime.motors[i].phase_increment = pm.phase_increment as i32;
                    if params.reset_flag {
                        // Exactly `-dda_ticks`, i.e. `-dda_ticks_downcount`
                        // since we just wrote it above.
                        self.runtime.motors[i].phase_accumulator =
                            -(params.dda_ticks as i32);
                    }
                    if pm.phase_increment != 0 {
                        // Direction settles before the timer is enabled.
                        match m {
                            Motor::Z => self.hal.dir_z().set(pm.dir),
                            Motor::R => self.hal.dir_r().set(pm.dir),
                        }
                        self.last_dir[i] = pm.dir;
                    }
                }

                self.hal.timer().clear_pending();
                self.hal.timer().start();
            }
            MoveKind::Null => {
                // No pulses, no pin writes, no timer arm.
            }
            MoveKind::Empty => {
                // Protocol guarantees this cannot be reached: exec_state ==
                // Loader only after prep_line/prep_null has set a real kind.
            }
        }

        self.exec_state.store(ExecOwner::Exec as u8, Ordering::Release);
        self.hal.exec_irq().pend();
    }

    /// Idempotent: triggers the load software interrupt.
    pub fn pend_load_request(&mut self) {
        self.hal.load_irq().pend();
    }

    /// Borrows the hardware surface, for board bring-up code that needs to
    /// poke a pin directly before motion starts.
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Borrows the enclosing motion controller.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Borrows the planner.
    pub fn planner_mut(&mut self) -> &mut P {
        &mut self.planner
    }
}
