//! # Embassy entry point
//!
//! A simpler, non-preemptive alternative to `rtic_main`. Embassy's
//! cooperative executor has no notion of the three hardware priority levels
//! the pipeline needs (DDA ISR > segment loader == segment preparer), so
//! this drives the same `stepper_core::StepperCore` pipeline from a single
//! task instead: a fixed-period `embassy_time::Ticker` stands in for the DDA
//! timer interrupt, and the exec/load requests run inline right after each
//! tick that drains a segment, rather than through a pended soft interrupt.
//! `rtic_main` is the entry point that actually demonstrates the pipeline
//! bound to real interrupt lines; this one is for boards or bring-up steps
//! that don't need RTIC.

use crate::boards::stm32f407::pins::BoardPins;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::Config;
use embassy_time::{Duration, Ticker};

use motion::{kinematics::ZrKinematics, LinearMotionPlanner};
use stepper_core::{Config as DdaConfig, DdaTimer, Hal, MotionController, SoftInterrupt, StepperCore};

use crate::stepper::{GpioDirPin, GpioStepPin};

const F_DDA: u32 = 50_000;
const PULSES_PER_UNIT: [f64; 2] = [80.0, 80.0];

/// No hardware timer to arm/disarm when the tick itself is the scheduler.
#[derive(Default)]
struct NoopTimer;
impl DdaTimer for NoopTimer {
    fn clear_pending(&mut self) {}
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

/// No separate interrupt line; the poll loop just calls the handler next.
#[derive(Default)]
struct InlineIrq {
    pending: bool,
}
impl SoftInterrupt for InlineIrq {
    fn pend(&mut self) {
        self.pending = true;
    }
}

struct EmbassyHal {
    step_z: GpioStepPin<Output<'static>>,
    step_r: GpioStepPin<Output<'static>>,
    dir_z: GpioDirPin<Output<'static>>,
    dir_r: GpioDirPin<Output<'static>>,
    timer: NoopTimer,
    exec_irq: InlineIrq,
    load_irq: InlineIrq,
}

impl Hal for EmbassyHal {
    type StepZ = GpioStepPin<Output<'static>>;
    type StepR = GpioStepPin<Output<'static>>;
    type DirZ = GpioDirPin<Output<'static>>;
    type DirR = GpioDirPin<Output<'static>>;
    type Timer = NoopTimer;
    type ExecIrq = InlineIrq;
    type LoadIrq = InlineIrq;

    fn step_z(&mut self) -> &mut Self::StepZ {
        &mut self.step_z
    }
    fn step_r(&mut self) -> &mut Self::StepR {
        &mut self.step_r
    }
    fn dir_z(&mut self) -> &mut Self::DirZ {
        &mut self.dir_z
    }
    fn dir_r(&mut self) -> &mut Self::DirR {
        &mut self.dir_r
    }
    fn timer(&mut self) -> &mut Self::Timer {
        &mut self.timer
    }
    fn exec_irq(&mut self) -> &mut Self::ExecIrq {
        &mut self.exec_irq
    }
    fn load_irq(&mut self) -> &mut Self::LoadIrq {
        &mut self.load_irq
    }
}

#[derive(Default)]
struct NoopController;
impl MotionController for NoopController {
    fn motion_complete(&mut self) {
        defmt::info!("motion complete");
    }
}

type Planner = LinearMotionPlanner<ZrKinematics>;
type Core = StepperCore<EmbassyHal, Planner, NoopController>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("Embassy entry point: Z/R stepper core");

    let config = Config::default();
    let p = embassy_stm32::init(config);
    let board_pins = BoardPins::new(p);

    let hal = EmbassyHal {
        step_z: GpioStepPin::new(Output::new(board_pins.z_step, Level::Low, Speed::High)),
        step_r: GpioStepPin::new(Output::new(board_pins.r_step, Level::Low, Speed::High)),
        dir_z: GpioDirPin::new(Output::new(board_pins.z_dir, Level::Low, Speed::Low)),
        dir_r: GpioDirPin::new(Output::new(board_pins.r_dir, Level::Low, Speed::Low)),
        timer: NoopTimer,
        exec_irq: InlineIrq::default(),
        load_irq: InlineIrq::default(),
    };

    let dda_config = DdaConfig::new(F_DDA, 1, 10, [false, false], PULSES_PER_UNIT, 1.0, 0x5A5A_5A5A);
    let planner = LinearMotionPlanner::new(ZrKinematics::new(PULSES_PER_UNIT));
    let mut core = StepperCore::init(dda_config, hal, planner, NoopController::default());

    // Kick the pipeline off: prepare whatever the planner has queued, then
    // load it once the preparer has run.
    core.pend_exec_request();
    core.pend_load_request();

    spawner.spawn(led_task(board_pins.led)).unwrap();
    spawner.spawn(dda_task(core)).unwrap();

    defmt::info!("Embassy tasks spawned");
}

#[embassy_executor::task]
async fn dda_task(mut core: Core) {
    let mut ticker = Ticker::every(Duration::from_hz(F_DDA as u64));
    loop {
        // Drain whatever got pended before the next tick arrives, same as
        // a real board servicing its software interrupts between DDA ticks.
        if core.hal_mut().load_irq.pending {
            core.hal_mut().load_irq.pending = false;
            core.request_load_move();
        }
        if core.hal_mut().exec_irq.pending {
            core.hal_mut().exec_irq.pending = false;
            core.request_exec_move();
        }
        ticker.next().await;
        core.pulse_tick();
    }
}

#[embassy_executor::task]
async fn led_task(led_pin: embassy_stm32::gpio::AnyPin) {
    use embassy_time::Timer;
    let mut led = Output::new(led_pin, Level::High, Speed::Low);
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(500)).await;
    }
}
