//! A deterministic, synchronous host harness: drives `stepper_core`'s DDA
//! pipeline through plain function calls against [`TraceHal`] instead of a
//! simulated wire protocol, recording every pulse, direction write, timer
//! arm, and interrupt pend for offline comparison against a golden trace.

use std::path::Path;

use anyhow::Result;

use stepper_core::{Config, Motor, Planner, StepperCore};

use crate::trace_hal::{TraceController, TraceEntry, TraceHal};

pub struct SimHost<P: Planner> {
    core: StepperCore<TraceHal, P, TraceController>,
}

impl<P: Planner> SimHost<P> {
    pub fn new(config: Config, planner: P) -> Self {
        let hal = TraceHal::default();
        let controller = TraceController::wired_to(&hal);
        let core = StepperCore::init(config, hal, planner, controller);
        Self { core }
    }

    /// Runs one DDA timer period.
    pub fn tick(&mut self) {
        self.core.pulse_tick();
    }

    pub fn request_exec(&mut self) {
        self.core.request_exec_move();
    }

    pub fn request_load(&mut self) {
        self.core.request_load_move();
    }

    /// Primes the pipeline (exec then load) and ticks until the queued
    /// segments fully drain. Requests a fresh exec every tick, the way a
    /// real board's preparer runs well ahead of a long segment finishing.
    /// The next segment is staged by the time the current one's downcount
    /// reaches zero and `pulse_tick` chains into the loader.
    pub fn run_to_completion(&mut self, max_ticks: u32) {
        self.request_exec();
        self.request_load();
        let mut ticks = 0;
        while self.core.is_busy() && ticks < max_ticks {
            self.request_exec();
            self.tick();
            ticks += 1;
        }
    }

    pub fn position(&self, motor: Motor) -> i32 {
        self.core.position(motor)
    }

    pub fn is_busy(&self) -> bool {
        self.core.is_busy()
    }

    pub fn planner_mut(&mut self) -> &mut P {
        self.core.planner_mut()
    }

    pub fn trace(&mut self) -> Vec<TraceEntry> {
        self.core.hal_mut().drain_trace()
    }

    /// Serializes the trace to `path` as pretty-printed JSON, for diffing
    /// against a checked-in golden trace in CI.
    pub fn dump_trace(&mut self, path: &Path) -> Result<()> {
        let trace = self.trace();
        let json = serde_json::to_string_pretty(&trace)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn check_integrity(&self) -> Result<(), stepper_core::CorruptionError> {
        self.core.check_integrity()
    }
}
