//! Two-axis heliostat armature kinematics.
//!
//! A heliostat mirror rides on a chain of two revolute joints (primary,
//! secondary) with the facet mounted in the secondary's frame.  Given the
//! heliostat's world placement, the sun direction, and an aiming point,
//! the solver finds the pair of joint angles for which the facet normal
//! bisects the sun and facet-to-target directions (law of reflection).
//!
//! # Architecture
//!
//! ```text
//! TrackerArmature2A ──► ReflectionSolver ──► TrackerTarget.angles
//! ```
//!
//! The armature geometry is fixed after construction; every solve is a
//! pure function of its inputs, so one armature description can serve
//! concurrent solves on distinct [`TrackerTarget`]s.

pub mod armature;
pub mod interval;
pub mod solver;

pub use armature::{AimingFrame, Angles, ArmatureAxis, Facet, TrackerArmature2A, TrackerTarget};
pub use interval::AngleInterval;
pub use solver::{ReflectionSolver, SolveStatus, SolverConfig};
