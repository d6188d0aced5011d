//! Closed-form reflection solver for the two-axis armature.
//!
//! The required facet normal is the bisector of the (negated incidence)
//! sun direction and the facet-to-target direction.  That normal is then
//! decomposed into the two joint rotations by projecting onto the
//! primary/secondary axis pair and taking an `atan2` per joint.  Because
//! the facet center itself moves with the joints, the bisector is refined
//! over a small fixed number of facet-point iterations.

use nalgebra::{Point3, Vector3};

use heliotrack_core::error::GeometryError;
use heliotrack_core::frame::Frame;
use heliotrack_core::sun::DEGREE;

use crate::armature::{AimingFrame, Angles, TrackerArmature2A, TrackerTarget};

/// Below this, the sun + target direction sum is considered degenerate
/// (anti-parallel vectors, 180-degree reflection).
const BISECTOR_EPS: f64 = 1e-9;

/// Below this, the primary/secondary axis pair is considered singular.
const AXIS_PAIR_EPS: f64 = 1e-8;

/// Configuration for the reflection solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum facet-point refinement iterations per solution branch.
    pub max_iterations: u32,
    /// Accepted distance (m) between the aim line and the facet center.
    pub aim_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            aim_tolerance: 0.001,
        }
    }
}

/// Limit status of a solved angle pair.
///
/// Out-of-limits solves still carry the mathematically solved angles in
/// the target, so callers choose the policy (clamp, fault, warn).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Both angles are within their joints' mechanical limits.
    InLimits,
    /// At least one angle violates its joint's limits.
    OutOfLimits { primary: bool, secondary: bool },
}

/// Reflection solver over a fixed armature description.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectionSolver {
    config: SolverConfig,
}

impl ReflectionSolver {
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solve one tracking update: transform the sun and aiming point into
    /// the armature frame, solve the reflection, select a solution, and
    /// write the angle pair (degrees) into the target.
    ///
    /// # Errors
    ///
    /// See [`TrackerArmature2A::update`].
    pub fn update(
        &self,
        armature: &TrackerArmature2A,
        to_global: &Frame,
        sun_world: &Vector3<f64>,
        target: &mut TrackerTarget,
    ) -> Result<SolveStatus, GeometryError> {
        let to_local = to_global.inverse();
        let sun_local = to_local.transform_direction(sun_world);

        let solutions = match target.aiming {
            AimingFrame::Global => {
                let aim_local = to_local.transform_point(&target.aiming_point);
                self.solve_reflection_global(armature, &sun_local, &aim_local)?
            }
            AimingFrame::Secondary => {
                self.solve_reflection_secondary(armature, &sun_local, &target.aiming_point)?
            }
        };

        let (angles, status) = self.select(armature, &solutions)?;
        target.angles = (angles.primary / DEGREE, angles.secondary / DEGREE);
        Ok(status)
    }

    /// Solve the reflection constraint for an aiming point in the
    /// armature's base frame.  Returns up to two candidate angle pairs
    /// (the two branches of the axis decomposition), already refined
    /// against the moving facet center.
    pub fn solve_reflection_global(
        &self,
        armature: &TrackerArmature2A,
        sun_local: &Vector3<f64>,
        aim_local: &Point3<f64>,
    ) -> Result<Vec<Angles>, GeometryError> {
        let sun = sun_local.normalize();
        let mut solutions = Vec::with_capacity(2);

        for branch in 0..2 {
            let mut facet_point = armature.facet_point(armature.default_angles());
            for _ in 0..self.config.max_iterations {
                let to_aim = aim_local - facet_point;
                let dist = to_aim.norm();
                if dist < BISECTOR_EPS {
                    // Aiming point coincides with the facet center.
                    break;
                }
                let v_target = to_aim / dist;

                let bisector = sun + v_target;
                if bisector.norm() < BISECTOR_EPS {
                    return Err(GeometryError::DegenerateBisector);
                }
                let normal = bisector.normalize();

                let candidates = self.solve_facet_normal(armature, &normal)?;
                let Some(angles) = candidates.get(branch).copied() else {
                    break;
                };

                facet_point = armature.facet_point(angles);
                let residual = (aim_local - facet_point).cross(&v_target).norm();
                if residual > self.config.aim_tolerance {
                    continue;
                }
                solutions.push(angles);
                break;
            }
        }

        Ok(solutions)
    }

    /// Solve the reflection constraint for an aiming point expressed in
    /// the secondary joint's frame.  The facet center is fixed in that
    /// frame, so no refinement loop is needed.
    pub fn solve_reflection_secondary(
        &self,
        armature: &TrackerArmature2A,
        sun_local: &Vector3<f64>,
        aim_secondary: &Point3<f64>,
    ) -> Result<Vec<Angles>, GeometryError> {
        let to_aim = aim_secondary.coords - armature.facet().shift();
        if to_aim.norm() < BISECTOR_EPS {
            return Ok(Vec::new());
        }
        let v_target = to_aim.normalize();

        // The sun direction that the rest orientation would reflect onto
        // the target; rotating it onto the actual sun direction yields the
        // same joint angles as rotating the facet normal.
        let n = armature.facet().normal().into_inner();
        let sun0 = 2.0 * v_target.dot(&n) * n - v_target;

        self.solve_rotation(armature, &sun0, &sun_local.normalize())
    }

    /// Angle pairs that rotate the rest facet normal onto `normal`.
    fn solve_facet_normal(
        &self,
        armature: &TrackerArmature2A,
        normal: &Vector3<f64>,
    ) -> Result<Vec<Angles>, GeometryError> {
        let v0 = armature.facet().normal().into_inner();
        self.solve_rotation(armature, &v0, normal)
    }

    /// Angle pairs `(primary, secondary)` whose chained rotations take the
    /// unit vector `v0` to the unit vector `v`.
    ///
    /// Decomposes `v`'s rotation through the two axes: the intermediate
    /// vector `m` (the image of `v0` after the secondary rotation alone)
    /// must keep its projection onto the secondary axis equal to `v0`'s
    /// and its projection onto the primary axis equal to `v`'s.  That
    /// constrains `m` to at most two positions, one per branch; each joint
    /// angle then falls out of an `atan2` in its rotation plane.
    ///
    /// Returns an empty vec when `v` is outside the reachable cone.
    ///
    /// # Errors
    ///
    /// [`GeometryError::ParallelAxes`] when the two joint axes are
    /// (anti-)parallel.
    pub fn solve_rotation(
        &self,
        armature: &TrackerArmature2A,
        v0: &Vector3<f64>,
        v: &Vector3<f64>,
    ) -> Result<Vec<Angles>, GeometryError> {
        let a = armature.primary().axis().into_inner();
        let b = armature.secondary().axis().into_inner();

        let k = a.cross(&b);
        let k2 = k.norm_squared();
        let ab = a.dot(&b);
        let det = 1.0 - ab * ab;
        if det.abs() < AXIS_PAIR_EPS {
            return Err(GeometryError::ParallelAxes);
        }

        let av = a.dot(v);
        let bv0 = b.dot(v0);
        let ma = (av - ab * bv0) / det;
        let mb = (bv0 - ab * av) / det;
        let mk = 1.0 - ma * ma - mb * mb - 2.0 * ma * mb * ab;
        if mk < 0.0 {
            return Ok(Vec::new());
        }
        let mk = (mk / k2).sqrt();

        let m0 = ma * a + mb * b;
        let mut solutions = Vec::with_capacity(2);
        for m in [m0 - mk * k, m0 + mk * k] {
            solutions.push(Angles::new(
                find_angle(&a, &m, v, av),
                find_angle(&b, v0, &m, bv0),
            ));
        }
        Ok(solutions)
    }

    /// Pick one solution: reduce each candidate to the representative
    /// nearest the joints' ranges and prefer in-limits candidates closest
    /// to the default configuration.  When every candidate violates a
    /// limit, the closest one is still returned, flagged
    /// [`SolveStatus::OutOfLimits`], expressed on the side of the violated
    /// bound so clamping to the limits lands on the right end.
    ///
    /// # Errors
    ///
    /// [`GeometryError::NoSolution`] when `solutions` is empty.
    pub fn select(
        &self,
        armature: &TrackerArmature2A,
        solutions: &[Angles],
    ) -> Result<(Angles, SolveStatus), GeometryError> {
        let defaults = armature.default_angles();
        let mut best_in_limits: Option<(Angles, f64)> = None;
        let mut best_any: Option<(Angles, f64, bool, bool)> = None;

        for candidate in solutions {
            let primary = armature
                .primary()
                .range()
                .closest_representative(candidate.primary);
            let secondary = armature
                .secondary()
                .range()
                .closest_representative(candidate.secondary);
            let primary_ok = armature.primary().range().contains(primary);
            let secondary_ok = armature.secondary().range().contains(secondary);

            let dp = primary - defaults.primary;
            let ds = secondary - defaults.secondary;
            let distance = dp * dp + ds * ds;
            let normalized = Angles::new(primary, secondary);

            if best_any.is_none_or(|(_, d, _, _)| distance < d) {
                best_any = Some((normalized, distance, primary_ok, secondary_ok));
            }
            if primary_ok
                && secondary_ok
                && best_in_limits.is_none_or(|(_, d)| distance < d)
            {
                best_in_limits = Some((normalized, distance));
            }
        }

        if let Some((angles, _)) = best_in_limits {
            return Ok((angles, SolveStatus::InLimits));
        }
        if let Some((angles, _, primary_ok, secondary_ok)) = best_any {
            return Ok((
                angles,
                SolveStatus::OutOfLimits {
                    primary: !primary_ok,
                    secondary: !secondary_ok,
                },
            ));
        }
        Err(GeometryError::NoSolution)
    }
}

/// Rotation angle around `a` that takes `m` to `v`, where `av` is the
/// (conserved) projection of both onto `a`.
fn find_angle(a: &Vector3<f64>, m: &Vector3<f64>, v: &Vector3<f64>, av: f64) -> f64 {
    a.dot(&m.cross(v)).atan2(m.dot(v) - av * av)
}
