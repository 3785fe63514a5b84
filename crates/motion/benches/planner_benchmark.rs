//! Benchmarks the per-segment cost of `LinearMotionPlanner::exec_move`:
//! a kinematics map plus one `prep_line` call, run at the medium interrupt
//! priority in a real deployment (the exec software interrupt).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motion::{kinematics::ZrKinematics, planner::PreparedMove, LinearMotionPlanner};
use stepper_core::{
    Config, DdaTimer, DirPin, Hal, MotionController, SoftInterrupt, StepPin, StepperCore,
};

#[derive(Default)]
struct NoopStepPin;
impl StepPin for NoopStepPin {
    fn pulse(&mut self) {}
}

#[derive(Default)]
struct NoopDirPin;
impl DirPin for NoopDirPin {
    fn set(&mut self, _reverse: bool) {}
}

#[derive(Default)]
struct NoopTimer;
impl DdaTimer for NoopTimer {
    fn clear_pending(&mut self) {}
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

#[derive(Default)]
struct NoopIrq;
impl SoftInterrupt for NoopIrq {
    fn pend(&mut self) {}
}

#[derive(Default)]
struct BenchHal {
    step_z: NoopStepPin,
    step_r: NoopStepPin,
    dir_z: NoopDirPin,
    dir_r: NoopDirPin,
    timer: NoopTimer,
    exec_irq: NoopIrq,
    load_irq: NoopIrq,
}

impl Hal for BenchHal {
    type StepZ = NoopStepPin;
    type StepR = NoopStepPin;
    type DirZ = NoopDirPin;
    type DirR = NoopDirPin;
    type Timer = NoopTimer;
    type ExecIrq = NoopIrq;
    type LoadIrq = NoopIrq;

    fn step_z(&mut self) -> &mut NoopStepPin {
        &mut self.step_z
    }
    fn step_r(&mut self) -> &mut NoopStepPin {
        &mut self.step_r
    }
    fn dir_z(&mut self) -> &mut NoopDirPin {
        &mut self.dir_z
    }
    fn dir_r(&mut self) -> &mut NoopDirPin {
        &mut self.dir_r
    }
    fn timer(&mut self) -> &mut NoopTimer {
        &mut self.timer
    }
    fn exec_irq(&mut self) -> &mut NoopIrq {
        &mut self.exec_irq
    }
    fn load_irq(&mut self) -> &mut NoopIrq {
        &mut self.load_irq
    }
}

#[derive(Default)]
struct NoopController;
impl MotionController for NoopController {
    fn motion_complete(&mut self) {}
}

fn benchmark_exec_move(c: &mut Criterion) {
    let config = Config::new(50_000, 1, 10, [false, false], [80.0, 80.0], 1.0, 0xDEAD_BEEF);
    let mv = PreparedMove {
        travel: [10.0, 2.0],
        directions: [false, true],
        microseconds: 5_000.0,
    };

    c.bench_function("linear_motion_planner_exec_move", |b| {
        b.iter(|| {
            let planner = LinearMotionPlanner::new(ZrKinematics::new([80.0, 80.0]));
            let mut core =
                StepperCore::init(config, BenchHal::default(), planner, NoopController::default());
            core.planner_mut().enqueue(black_box(mv)).ok();
            core.request_exec_move();
            black_box(&core);
        })
    });
}

criterion_group!(benches, benchmark_exec_move);
criterion_main!(benches);
