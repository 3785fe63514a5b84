//! # RTIC-based Firmware Entry Point
//!
//! Wires `stepper_core::StepperCore` to real hardware: `TIM2` drives the DDA
//! pulse generator at the highest task priority, and two RTIC software
//! tasks dispatched through free interrupts stand in for the exec and load
//! software interrupts. RTIC's priority-ceiling resource lock gives the same
//! "higher preempts lower, same level never preempts same level" guarantee
//! the three hardware priority levels need.

#![allow(unused_imports)]

#[rtic::app(device = stm32f4xx_hal::pac, dispatchers = [EXTI0, EXTI1])]
mod app {
    use stm32f4xx_hal::{
        gpio::{gpiob, gpioc, gpiod, gpioe, Output, PushPull},
        pac::TIM2,
        prelude::*,
        timer::{CounterUs, Event as TimerEvent},
    };
    use rtic_monotonics::{systick::*, Monotonic};

    use crate::stepper::{GpioDirPin, GpioStepPin};
    use motion::{kinematics::ZrKinematics, LinearMotionPlanner};
    use stepper_core::{Config, DdaTimer, Hal, MotionController, SoftInterrupt, StepperCore};

    type LedPin = gpiod::PD12<Output<PushPull>>;
    type ZStepPin = gpioe::PE2<Output<PushPull>>;
    type ZDirPin = gpiob::PB8<Output<PushPull>>;
    type RStepPin = gpioc::PC5<Output<PushPull>>;
    type RDirPin = gpiob::PB2<Output<PushPull>>;

    /// Wraps `CounterUs<TIM2>` so the foreign-type/foreign-trait orphan rule
    /// doesn't block implementing `DdaTimer` directly on it.
    pub struct Tim2Dda {
        timer: CounterUs<TIM2>,
    }

    impl DdaTimer for Tim2Dda {
        fn clear_pending(&mut self) {
            self.timer.clear_interrupt(TimerEvent::Update);
        }
        fn start(&mut self) {
            // F_DDA fixed at init; re-arming just restarts the same period.
            self.timer.start(super::F_DDA_PERIOD_US.micros()).ok();
        }
        fn stop(&mut self) {
            self.timer.cancel().ok();
        }
    }

    /// Zero-sized handle whose `pend()` spawns the matching RTIC software
    /// task — the free-interrupt dispatcher standing in for a dedicated
    /// low-priority interrupt line.
    #[derive(Default)]
    pub struct ExecIrqHandle;
    impl SoftInterrupt for ExecIrqHandle {
        fn pend(&mut self) {
            exec_task::spawn().ok();
        }
    }

    #[derive(Default)]
    pub struct LoadIrqHandle;
    impl SoftInterrupt for LoadIrqHandle {
        fn pend(&mut self) {
            load_task::spawn().ok();
        }
    }

    pub struct BoardHal {
        step_z: GpioStepPin<ZStepPin>,
        step_r: GpioStepPin<RStepPin>,
        dir_z: GpioDirPin<ZDirPin>,
        dir_r: GpioDirPin<RDirPin>,
        timer: Tim2Dda,
        exec_irq: ExecIrqHandle,
        load_irq: LoadIrqHandle,
    }

    impl Hal for BoardHal {
        type StepZ = GpioStepPin<ZStepPin>;
        type StepR = GpioStepPin<RStepPin>;
        type DirZ = GpioDirPin<ZDirPin>;
        type DirR = GpioDirPin<RDirPin>;
        type Timer = Tim2Dda;
        type ExecIrq = ExecIrqHandle;
        type LoadIrq = LoadIrqHandle;

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

    /// Stands in for the enclosing motor controller: a settable
    /// `motion_complete` flag. A full host/gcode layer is out of scope for
    /// this crate.
    #[derive(Default)]
    pub struct BoardController {
        pub motion_complete: bool,
    }
    impl MotionController for BoardController {
        fn motion_complete(&mut self) {
            self.motion_complete = true;
            defmt::info!("motion complete");
        }
    }

    type Planner = LinearMotionPlanner<ZrKinematics>;
    type Core = StepperCore<BoardHal, Planner, BoardController>;

    #[shared]
    struct Shared {
        core: Core,
    }

    #[local]
    struct Local {
        led: LedPin,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        defmt::info!("RTIC init: Z/R stepper core");
        let dp = cx.device;

        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.use_hse(8.MHz()).sysclk(168.MHz()).freeze();

        let systick_mono_token = rtic_monotonics::create_systick_token!();
        Systick::start(cx.core.SYST, clocks.hclk().0, systick_mono_token);

        let gpiob = dp.GPIOB.split();
        let gpioc = dp.GPIOC.split();
        let gpiod = dp.GPIOD.split();
        let gpioe = dp.GPIOE.split();

        let mut led = gpiod.pd12.into_push_pull_output();
        led.set_high();

        let z_step = gpioe.pe2.into_push_pull_output();
        let z_dir = gpiob.pb8.into_push_pull_output();
        let r_step = gpioc.pc5.into_push_pull_output();
        let r_dir = gpiob.pb2.into_push_pull_output();

        let mut tim2 = dp.TIM2.counter_us(&clocks);
        tim2.listen(TimerEvent::Update);

        let hal = BoardHal {
            step_z: GpioStepPin::new(z_step),
            step_r: GpioStepPin::new(r_step),
            dir_z: GpioDirPin::new(z_dir),
            dir_r: GpioDirPin::new(r_dir),
            timer: Tim2Dda { timer: tim2 },
            exec_irq: ExecIrqHandle,
            load_irq: LoadIrqHandle,
        };

        let config = Config::new(
            super::F_DDA,
            super::SUBSTEPS,
            super::ACCUMULATOR_RESET_FACTOR,
            [false, false],
            super::PULSES_PER_UNIT,
            super::EPSILON_US,
            super::MAGICNUM,
        );
        let planner = LinearMotionPlanner::new(ZrKinematics::new(super::PULSES_PER_UNIT));
        let mut core = StepperCore::init(config, hal, planner, BoardController::default());

        // Kick the pipeline off: prepare whatever the planner has queued,
        // then load it once the preparer has run.
        core.pend_exec_request();
        core.pend_load_request();

        defmt::info!("RTIC init complete");

        (Shared { core }, Local { led })
    }

    #[idle(local = [led])]
    fn idle(cx: idle::Context) -> ! {
        loop {
            cx.local.led.toggle();
            Systick::delay(500.millis()).unwrap();
        }
    }

    /// DDA pulse generator. Highest priority: nothing else
    /// in this app may preempt it.
    #[task(binds = TIM2, shared = [core], priority = 3)]
    fn dda_isr(mut cx: dda_isr::Context) {
        cx.shared.core.lock(|core| {
            core.hal_mut().timer.clear_pending();
            core.pulse_tick();
        });
    }

    /// Segment preparer trigger. Medium priority,
    /// same level as `load_task` — RTIC guarantees same-priority tasks
    /// never preempt each other.
    #[task(shared = [core], priority = 2)]
    async fn exec_task(mut cx: exec_task::Context) {
        cx.shared.core.lock(|core| core.request_exec_move());
    }

    /// Segment loader trigger.
    #[task(shared = [core], priority = 2)]
    async fn load_task(mut cx: load_task::Context) {
        cx.shared.core.lock(|core| core.request_load_move());
    }
}

/// DDA tick frequency (Hz). See `stepper_core::config::Config::f_dda`.
const F_DDA: u32 = 50_000;
const F_DDA_PERIOD_US: u32 = 1_000_000 / F_DDA;
const SUBSTEPS: u32 = 1;
const ACCUMULATOR_RESET_FACTOR: u32 = 10;
const PULSES_PER_UNIT: [f64; 2] = [80.0, 80.0];
const EPSILON_US: f64 = 1.0;
const MAGICNUM: u32 = 0x5A5A_5A5A;
