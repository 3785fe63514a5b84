//! Adapts plain `embedded_hal` GPIO output pins to the `stepper_core::hal`
//! pin traits, the way `driver-drv8825::Drv8825` adapts `OutputPin`s to its
//! own step/direction methods. `DdaTimer` and `SoftInterrupt` are not
//! implemented here — they need the concrete RTIC (or Embassy) resources
//! bound at `#[init]`, so those live next to the app definition in
//! `rtic_main`/`embassy_main` instead.

use embedded_hal::digital::OutputPin;
use stepper_core::{DirPin, StepPin};

/// Cortex-M cycles to hold the step line high. At 168 MHz this is ~1µs,
/// the minimum pulse width the DRV8825 datasheet requires. Cores this much
/// faster than the original 8-bit AVR need an explicit delay rather than
/// relying on ISR instruction latency to hold the pulse width.
const STEP_PULSE_CYCLES: u32 = 200;

/// One GPIO output pin driven as a step pulse line.
pub struct GpioStepPin<P> {
    pin: P,
}

impl<P: OutputPin> GpioStepPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> StepPin for GpioStepPin<P> {
    fn pulse(&mut self) {
        let _ = self.pin.set_high();
        cortex_m::asm::delay(STEP_PULSE_CYCLES);
        let _ = self.pin.set_low();
    }
}

/// One GPIO output pin driven as a direction line.
pub struct GpioDirPin<P> {
    pin: P,
}

impl<P: OutputPin> GpioDirPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> DirPin for GpioDirPin<P> {
    fn set(&mut self, reverse: bool) {
        let result = if reverse {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        let _ = result;
    }
}
