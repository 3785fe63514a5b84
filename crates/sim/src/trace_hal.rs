//! A software `Hal`/`MotionController` pair that records every pin write,
//! timer arm, and software-interrupt pend into a shared trace log instead of
//! touching real hardware, in the style of `stepper-core`'s own `FakeHal`
//! test fixture but exposed for use from a harness rather than buried in a
//! test module.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use stepper_core::{DdaTimer, DirPin, Hal, MotionController, SoftInterrupt, StepPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceMotor {
    Z,
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceEvent {
    /// A step pulse was emitted on the named motor.
    Pulse { motor: TraceMotor },
    /// The direction pin was set. `reverse` mirrors `DirPin::set`'s argument.
    DirSet { motor: TraceMotor, reverse: bool },
    TimerStart,
    TimerStop,
    /// The exec (preparer) software interrupt was pended.
    ExecPend,
    /// The load software interrupt was pended.
    LoadPend,
    MotionComplete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Monotonic sequence number, not a wall-clock timestamp: the harness is
    /// driven by synchronous function calls, so ordering is all that's
    /// meaningful and all that stays reproducible across runs.
    pub seq: u64,
    pub event: TraceEvent,
}

#[derive(Default)]
struct TraceLog {
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    fn push(&mut self, event: TraceEvent) {
        let seq = self.entries.len() as u64;
        tracing::debug!(?event, seq, "trace");
        self.entries.push(TraceEntry { seq, event });
    }
}

type SharedLog = Rc<RefCell<TraceLog>>;

pub struct TraceStepPin {
    motor: TraceMotor,
    log: SharedLog,
    pub pulses: u32,
}

impl StepPin for TraceStepPin {
    fn pulse(&mut self) {
        self.pulses += 1;
        self.log.borrow_mut().push(TraceEvent::Pulse { motor: self.motor });
    }
}

pub struct TraceDirPin {
    motor: TraceMotor,
    log: SharedLog,
    pub reverse: bool,
}

impl DirPin for TraceDirPin {
    fn set(&mut self, reverse: bool) {
        self.reverse = reverse;
        self.log
            .borrow_mut()
            .push(TraceEvent::DirSet { motor: self.motor, reverse });
    }
}

#[derive(Default)]
pub struct TraceTimer {
    log: Option<SharedLog>,
    pub running: bool,
}

impl DdaTimer for TraceTimer {
    fn clear_pending(&mut self) {}
    fn start(&mut self) {
        self.running = true;
        if let Some(log) = &self.log {
            log.borrow_mut().push(TraceEvent::TimerStart);
        }
    }
    fn stop(&mut self) {
        self.running = false;
        if let Some(log) = &self.log {
            log.borrow_mut().push(TraceEvent::TimerStop);
        }
    }
}

pub struct TraceIrq {
    event: TraceEvent,
    log: SharedLog,
    pub pends: u32,
}

impl SoftInterrupt for TraceIrq {
    fn pend(&mut self) {
        self.pends += 1;
        self.log.borrow_mut().push(self.event);
    }
}

pub struct TraceHal {
    pub step_z: TraceStepPin,
    pub step_r: TraceStepPin,
    pub dir_z: TraceDirPin,
    pub dir_r: TraceDirPin,
    pub timer: TraceTimer,
    pub exec_irq: TraceIrq,
    pub load_irq: TraceIrq,
    log: SharedLog,
}

impl TraceHal {
    fn new() -> Self {
        let log: SharedLog = Rc::new(RefCell::new(TraceLog::default()));
        Self {
            step_z: TraceStepPin { motor: TraceMotor::Z, log: log.clone(), pulses: 0 },
            step_r: TraceStepPin { motor: TraceMotor::R, log: log.clone(), pulses: 0 },
            dir_z: TraceDirPin { motor: TraceMotor::Z, log: log.clone(), reverse: false },
            dir_r: TraceDirPin { motor: TraceMotor::R, log: log.clone(), reverse: false },
            timer: TraceTimer { log: Some(log.clone()), running: false },
            exec_irq: TraceIrq { event: TraceEvent::ExecPend, log: log.clone(), pends: 0 },
            load_irq: TraceIrq { event: TraceEvent::LoadPend, log: log.clone(), pends: 0 },
            log,
        }
    }

    pub fn drain_trace(&self) -> Vec<TraceEntry> {
        self.log.borrow().entries.clone()
    }
}

impl Default for TraceHal {
    fn default() -> Self {
        Self::new()
    }
}

impl Hal for TraceHal {
    type StepZ = TraceStepPin;
    type StepR = TraceStepPin;
    type DirZ = TraceDirPin;
    type DirR = TraceDirPin;
    type Timer = TraceTimer;
    type ExecIrq = TraceIrq;
    type LoadIrq = TraceIrq;

    fn step_z(&mut self) -> &mut TraceStepPin {
        &mut self.step_z
    }
    fn step_r(&mut self) -> &mut TraceStepPin {
        &mut self.step_r
    }
    fn dir_z(&mut self) -> &mut TraceDirPin {
        &mut self.dir_z
    }
    fn dir_r(&mut self) -> &mut TraceDirPin {
        &mut self.dir_r
    }
    fn timer(&mut self) -> &mut TraceTimer {
        &mut self.timer
    }
    fn exec_irq(&mut self) -> &mut TraceIrq {
        &mut self.exec_irq
    }
    fn load_irq(&mut self) -> &mut TraceIrq {
        &mut self.load_irq
    }
}

#[derive(Default)]
pub struct TraceController {
    log: Option<SharedLog>,
    pub completions: u32,
}

impl MotionController for TraceController {
    fn motion_complete(&mut self) {
        self.completions += 1;
        if let Some(log) = &self.log {
            log.borrow_mut().push(TraceEvent::MotionComplete);
        }
    }
}

impl TraceController {
    pub fn wired_to(hal: &TraceHal) -> Self {
        Self { log: Some(hal.log.clone()), completions: 0 }
    }
}
