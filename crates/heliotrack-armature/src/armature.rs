//! Two-axis armature description and the per-update target container.

use nalgebra::{Point3, UnitVector3, Vector3};

use heliotrack_core::config::{ArmatureConfig, FacetConfig, JointConfig};
use heliotrack_core::error::{CalibrationError, GeometryError};
use heliotrack_core::frame::Frame;

use crate::interval::AngleInterval;
use crate::solver::{ReflectionSolver, SolveStatus};

const AXIS_EPS: f64 = 1e-12;

/// A primary/secondary joint angle pair in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Angles {
    pub primary: f64,
    pub secondary: f64,
}

impl Angles {
    pub const fn new(primary: f64, secondary: f64) -> Self {
        Self { primary, secondary }
    }
}

/// One revolute joint of the armature: a translation offset from the
/// parent frame, a unit rotation axis, mechanical limits, and the rest
/// angle used to seed the solve.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmatureAxis {
    shift: Vector3<f64>,
    axis: UnitVector3<f64>,
    range: AngleInterval,
    default_angle: f64,
}

impl ArmatureAxis {
    /// New joint.  `default_angle` is in radians.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::ZeroVector`] when `axis` has (near-)zero length.
    pub fn new(
        shift: Vector3<f64>,
        axis: Vector3<f64>,
        range: AngleInterval,
        default_angle: f64,
    ) -> Result<Self, CalibrationError> {
        if axis.norm() < AXIS_EPS {
            return Err(CalibrationError::ZeroVector { name: "joint axis" });
        }
        Ok(Self {
            shift,
            axis: UnitVector3::new_normalize(axis),
            range,
            default_angle,
        })
    }

    fn from_config(cfg: &JointConfig) -> Result<Self, CalibrationError> {
        use heliotrack_core::sun::DEGREE;
        Self::new(
            Vector3::from(cfg.shift),
            Vector3::from(cfg.axis),
            AngleInterval::from_degrees(cfg.angle_range_deg[0], cfg.angle_range_deg[1])?,
            cfg.default_angle_deg * DEGREE,
        )
    }

    /// Joint placement in the parent frame at the given rotation (radians).
    pub fn frame(&self, angle: f64) -> Frame {
        Frame::joint(&self.shift, &self.axis, angle)
    }

    pub fn shift(&self) -> &Vector3<f64> {
        &self.shift
    }

    pub fn axis(&self) -> &UnitVector3<f64> {
        &self.axis
    }

    pub fn range(&self) -> &AngleInterval {
        &self.range
    }

    pub fn default_angle(&self) -> f64 {
        self.default_angle
    }
}

/// Mirror facet mounted in the secondary joint's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    shift: Vector3<f64>,
    normal: UnitVector3<f64>,
}

impl Facet {
    pub fn new(shift: Vector3<f64>, normal: Vector3<f64>) -> Result<Self, CalibrationError> {
        if normal.norm() < AXIS_EPS {
            return Err(CalibrationError::ZeroVector {
                name: "facet normal",
            });
        }
        Ok(Self {
            shift,
            normal: UnitVector3::new_normalize(normal),
        })
    }

    fn from_config(cfg: &FacetConfig) -> Result<Self, CalibrationError> {
        Self::new(Vector3::from(cfg.shift), Vector3::from(cfg.normal))
    }

    pub fn shift(&self) -> &Vector3<f64> {
        &self.shift
    }

    pub fn normal(&self) -> &UnitVector3<f64> {
        &self.normal
    }
}

/// The two-axis tracker armature: primary joint, secondary joint, facet.
///
/// Geometry is fixed after construction.  Solved angle state lives in the
/// caller's [`TrackerTarget`], never here, so a single armature can back
/// any number of concurrent solves.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerArmature2A {
    primary: ArmatureAxis,
    secondary: ArmatureAxis,
    facet: Facet,
}

impl TrackerArmature2A {
    pub fn new(primary: ArmatureAxis, secondary: ArmatureAxis, facet: Facet) -> Self {
        Self {
            primary,
            secondary,
            facet,
        }
    }

    /// Build an armature from a calibration config, validating as it goes.
    pub fn from_config(cfg: &ArmatureConfig) -> Result<Self, CalibrationError> {
        Ok(Self::new(
            ArmatureAxis::from_config(&cfg.primary)?,
            ArmatureAxis::from_config(&cfg.secondary)?,
            Facet::from_config(&cfg.facet)?,
        ))
    }

    pub fn primary(&self) -> &ArmatureAxis {
        &self.primary
    }

    pub fn secondary(&self) -> &ArmatureAxis {
        &self.secondary
    }

    pub fn facet(&self) -> &Facet {
        &self.facet
    }

    /// The rest configuration both joints default to.
    pub fn default_angles(&self) -> Angles {
        Angles::new(self.primary.default_angle, self.secondary.default_angle)
    }

    /// Facet center in the armature's base frame at the given joint angles.
    pub fn facet_point(&self, angles: Angles) -> Point3<f64> {
        let p = self
            .secondary
            .frame(angles.secondary)
            .transform_point(&Point3::from(self.facet.shift));
        self.primary.frame(angles.primary).transform_point(&p)
    }

    /// Facet normal in the armature's base frame at the given joint angles.
    pub fn facet_normal(&self, angles: Angles) -> Vector3<f64> {
        let n = self
            .secondary
            .frame(angles.secondary)
            .transform_direction(&self.facet.normal.into_inner());
        self.primary
            .frame(angles.primary)
            .transform_direction(&n)
    }

    /// Solve the tracking angles for one update with the default solver.
    ///
    /// `to_global` places the armature in the world, `sun_world` points
    /// towards the sun in world coordinates.  On success the solved angle
    /// pair is written to `target.angles` (degrees) and the limit status
    /// is returned.
    ///
    /// # Errors
    ///
    /// [`GeometryError::DegenerateBisector`] when sun and aiming directions
    /// are anti-parallel, [`GeometryError::NoSolution`] when no armature
    /// orientation reflects onto the aiming point, and
    /// [`GeometryError::ParallelAxes`] for a singular axis pair.
    pub fn update(
        &self,
        to_global: &Frame,
        sun_world: &Vector3<f64>,
        target: &mut TrackerTarget,
    ) -> Result<SolveStatus, GeometryError> {
        ReflectionSolver::default().update(self, to_global, sun_world, target)
    }
}

/// Which frame the aiming point is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AimingFrame {
    /// World coordinates (shared with the heliostat placement).
    #[default]
    Global,
    /// The secondary joint's local frame.
    Secondary,
}

/// Per-update value: the aiming point as input, the solved angle pair as
/// output.  Created fresh for each update; the solver is the single
/// writer of `angles`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerTarget {
    /// Aiming point, in the frame selected by `aiming`.
    pub aiming_point: Point3<f64>,
    pub aiming: AimingFrame,
    /// Solved (primary, secondary) angles in degrees.
    pub angles: (f64, f64),
}

impl TrackerTarget {
    /// Target aimed at a world-coordinate point.
    pub fn new(aiming_point: Point3<f64>) -> Self {
        Self {
            aiming_point,
            aiming: AimingFrame::Global,
            angles: (0.0, 0.0),
        }
    }

    /// Target aimed at a point in the secondary joint's frame.
    pub fn in_secondary_frame(aiming_point: Point3<f64>) -> Self {
        Self {
            aiming: AimingFrame::Secondary,
            ..Self::new(aiming_point)
        }
    }
}
