//! Drives a couple of queued moves through the Z/R DDA pipeline and dumps
//! the resulting pulse/direction/interrupt trace to `/tmp/sim_trace.json`,
//! creating a golden trace on first run for later comparison in CI.

use std::path::Path;

use anyhow::Result;

use motion::{kinematics::ZrKinematics, planner::PreparedMove, LinearMotionPlanner};
use sim::SimHost;
use stepper_core::{Config, Motor};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::new(50_000, 1, 10, [false, false], [80.0, 80.0], 1.0, 0xDEAD_BEEF);
    let mut planner = LinearMotionPlanner::new(ZrKinematics::new([80.0, 80.0]));
    planner
        .enqueue(PreparedMove {
            travel: [10.0, 5.0],
            directions: [false, true],
            microseconds: 1_000_000.0,
        })
        .map_err(|e| anyhow::anyhow!("{e:?}"))?;
    planner
        .enqueue(PreparedMove {
            travel: [-2.0, 0.0],
            directions: [true, false],
            microseconds: 200_000.0,
        })
        .map_err(|e| anyhow::anyhow!("{e:?}"))?;

    let mut host = SimHost::new(config, planner);
    host.run_to_completion(200_000);

    tracing::info!(
        z = host.position(Motor::Z),
        r = host.position(Motor::R),
        "final position"
    );

    let trace_path = Path::new("/tmp/sim_trace.json");
    host.dump_trace(trace_path)?;
    tracing::info!(path = %trace_path.display(), "trace written");

    Ok(())
}
