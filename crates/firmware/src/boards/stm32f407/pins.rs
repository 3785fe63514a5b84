//! Pin mapping for a two-axis (Z, R) stepper board on an STM32F407.
//! A starting point — verify against the target board's schematic before
//! bringing up real hardware.

use embassy_stm32::gpio::AnyPin;

/// Board pins the firmware needs: an LED plus step/direction pins for the
/// two motors the DDA core drives.
pub struct BoardPins {
    pub led: AnyPin,
    pub z_step: AnyPin,
    pub z_dir: AnyPin,
    pub r_step: AnyPin,
    pub r_dir: AnyPin,
}

impl BoardPins {
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        use embassy_stm32::gpio::Pin as _;

        Self {
            led: p.PB1.degrade(),
            z_step: p.PE2.degrade(),
            z_dir: p.PB8.degrade(),
            r_step: p.PC5.degrade(),
            r_dir: p.PB2.degrade(),
        }
    }
}
