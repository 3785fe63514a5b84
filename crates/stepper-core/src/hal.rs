//! Hardware abstraction traits.
//!
//! Mirrors `mcu-drivers::stepper`'s `AtomicGpioPort`/`Timer` traits, split
//! per-pin in the style of `driver-drv8825::Drv8825<STEP, DIR, EN, M0, M1, M2>`
//! rather than as a shared port, since the DDA core does not assume the two
//! motors' step/direction pins share a GPIO port.

/// A single step-pulse output pin.
pub trait StepPin {
    /// Emits one pulse: raise, hold for the driver's minimum pulse width,
    /// lower. Implementations on cores faster than the ~1µs the original
    /// 8-bit ISR body provided for free must insert an explicit delay or use
    /// a hardware one-shot.
    fn pulse(&mut self);
}

/// A single direction output pin.
pub trait DirPin {
    /// Writes the pin level. One write, no read-modify-write of unrelated
    /// bits.
    fn set(&mut self, reverse: bool);
}

/// The fixed-period hardware timer that drives the DDA pulse generator.
pub trait DdaTimer {
    /// Resets the counter and clears any pending compare-match flag.
    fn clear_pending(&mut self);
    /// Arms the timer so it fires at `F_DDA` Hz.
    fn start(&mut self);
    /// Disables the timer.
    fn stop(&mut self);
}

/// One of the two medium-priority software interrupts used to bridge
/// contexts without doing heavyweight work inside the DDA ISR.
pub trait SoftInterrupt {
    /// Requests that the bound handler run at its assigned priority.
    /// Idempotent: pending the interrupt when it is already pending has no
    /// additional effect.
    fn pend(&mut self);
}

/// The full hardware surface the core needs: two step pins, two direction
/// pins, the DDA timer, and the two software-interrupt lines.
pub trait Hal {
    type StepZ: StepPin;
    type StepR: StepPin;
    type DirZ: DirPin;
    type DirR: DirPin;
    type Timer: DdaTimer;
    type ExecIrq: SoftInterrupt;
    type LoadIrq: SoftInterrupt;

    fn step_z(&mut self) -> &mut Self::StepZ;
    fn step_r(&mut self) -> &mut Self::StepR;
    fn dir_z(&mut self) -> &mut Self::DirZ;
    fn dir_r(&mut self) -> &mut Self::DirR;
    fn timer(&mut self) -> &mut Self::Timer;
    fn exec_irq(&mut self) -> &mut Self::ExecIrq;
    fn load_irq(&mut self) -> &mut Self::LoadIrq;
}
