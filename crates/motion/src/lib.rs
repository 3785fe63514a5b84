//! # Motion Control Crate
//!
//! The upstream collaborator for `stepper-core`'s DDA pipeline: a pure
//! kinematics mapper and a thin `Planner` stub that turns queued
//! constant-velocity segments into `prep_line`/`prep_null` calls. Full
//! velocity profiling, junction deviation, and multi-axis kinematics beyond
//! the two-motor (Z, R) machine are out of scope and live upstream of this
//! crate.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod errors;
pub mod kinematics;
pub mod planner;

pub use errors::PlannerError;
pub use kinematics::{Kinematics, ZrKinematics, AXES};
pub use planner::{LinearMotionPlanner, PreparedMove};
