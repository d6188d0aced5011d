//! Elevation-axis actuator model.
//!
//! Two linkage topologies exist in the field, selected at construction:
//! a plain four-bar with a directly calibrated phase angle, and a variant
//! with an auxiliary crank whose arm-length difference folds into an
//! equivalent phase.

use heliotrack_core::config::ElevationLinkageConfig;
use heliotrack_core::error::{CalibrationError, GeometryError};

use crate::{check_assemblable, check_length, check_offset};

/// The two observed elevation linkage topologies.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Topology {
    /// Calibrated phase angle plus a static stroke offset.
    Simple { alpha2: f64, offset: f64 },
    /// Auxiliary crank with arms `ra` and `rd`; the phase is
    /// `asin((ra - rd) / rad)` and there is no stroke offset.
    AuxCrank { ra: f64, rd: f64 },
}

/// Kinematic model of the elevation actuator: joint angle (radians) to
/// stroke length (meters) and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationAngleKm {
    gamma: f64,
    rab: f64,
    rbc: f64,
    rad: f64,
    topology: Topology,
}

impl ElevationAngleKm {
    /// Plain four-bar topology.
    ///
    /// # Errors
    ///
    /// [`CalibrationError`] when an arm length is non-positive, the
    /// triangle cannot close, or `offset` is negative.
    pub fn simple(
        gamma: f64,
        rab: f64,
        rbc: f64,
        rad: f64,
        alpha2: f64,
        offset: f64,
    ) -> Result<Self, CalibrationError> {
        Self::validate(rab, rbc, rad)?;
        check_offset(offset)?;
        Ok(Self {
            gamma,
            rab,
            rbc,
            rad,
            topology: Topology::Simple { alpha2, offset },
        })
    }

    /// Auxiliary-crank topology with arms `ra` and `rd`.
    ///
    /// # Errors
    ///
    /// [`CalibrationError`] when any length is non-positive, the
    /// triangle cannot close, or the arm difference exceeds `rad` so no
    /// phase angle exists.
    pub fn with_aux_crank(
        gamma: f64,
        rab: f64,
        rbc: f64,
        rad: f64,
        ra: f64,
        rd: f64,
    ) -> Result<Self, CalibrationError> {
        Self::validate(rab, rbc, rad)?;
        check_length("ra", ra)?;
        check_length("rd", rd)?;
        if (ra - rd).abs() >= rad {
            return Err(CalibrationError::UnfoldableCrank {
                difference: (ra - rd).abs(),
                rad,
            });
        }
        Ok(Self {
            gamma,
            rab,
            rbc,
            rad,
            topology: Topology::AuxCrank { ra, rd },
        })
    }

    /// Build from a calibration config.
    pub fn from_config(cfg: &ElevationLinkageConfig) -> Result<Self, CalibrationError> {
        match *cfg {
            ElevationLinkageConfig::Simple {
                gamma,
                rab,
                rbc,
                rad,
                alpha2,
                offset,
            } => Self::simple(gamma, rab, rbc, rad, alpha2, offset),
            ElevationLinkageConfig::AuxCrank {
                gamma,
                rab,
                rbc,
                rad,
                ra,
                rd,
            } => Self::with_aux_crank(gamma, rab, rbc, rad, ra, rd),
        }
    }

    fn validate(rab: f64, rbc: f64, rad: f64) -> Result<(), CalibrationError> {
        check_length("rab", rab)?;
        check_length("rbc", rbc)?;
        check_length("rad", rad)?;
        check_assemblable(rab, rbc, rad)
    }

    /// Phase between the actuator attachment and the joint's zero reference.
    fn alpha2(&self) -> f64 {
        match self.topology {
            Topology::Simple { alpha2, .. } => alpha2,
            Topology::AuxCrank { ra, rd } => ((ra - rd) / self.rad).asin(),
        }
    }

    /// Static stroke offset subtracted from the triangle side.
    fn offset(&self) -> f64 {
        match self.topology {
            Topology::Simple { offset, .. } => offset,
            Topology::AuxCrank { .. } => 0.0,
        }
    }

    /// Realizable joint angle range `(alpha2 - gamma, alpha2 - gamma + π)`
    /// over which `length_from_angle` and `angle_from_length` are mutual
    /// inverses and the length is strictly monotonic.
    pub fn realizable_range(&self) -> (f64, f64) {
        let lo = self.alpha2() - self.gamma;
        (lo, lo + std::f64::consts::PI)
    }

    /// Actuator stroke length (m) for an elevation angle (radians).
    ///
    /// # Errors
    ///
    /// [`GeometryError::UnreachableAngle`] when the linkage cannot reach
    /// the requested angle (law-of-cosines argument leaves the triangle).
    pub fn length_from_angle(&self, angle: f64) -> Result<f64, GeometryError> {
        let rab2 = self.rab * self.rab;
        let rad2 = self.rad * self.rad;
        let rbc2 = self.rbc * self.rbc;

        let included = angle + self.gamma - self.alpha2();
        let x_square = rab2 + rad2 - rbc2 + 2.0 * self.rab * self.rad * included.cos();
        if x_square < 0.0 {
            return Err(GeometryError::UnreachableAngle { angle });
        }

        let length = x_square.sqrt() - self.offset();
        if length <= 0.0 {
            return Err(GeometryError::UnreachableAngle { angle });
        }
        Ok(length)
    }

    /// Elevation angle (radians) for an actuator stroke length (m).
    ///
    /// Inverts [`Self::length_from_angle`] over the principal branch, so
    /// the returned angle lies in [`Self::realizable_range`].
    ///
    /// # Errors
    ///
    /// [`GeometryError::UnreachableLength`] when no triangle closes at
    /// this length.
    pub fn angle_from_length(&self, length: f64) -> Result<f64, GeometryError> {
        let rab2 = self.rab * self.rab;
        let rad2 = self.rad * self.rad;
        let rbc2 = self.rbc * self.rbc;
        let x = length + self.offset();

        let cos_arg = (rbc2 + x * x - rab2 - rad2) / (2.0 * self.rab * self.rad);
        if !(-1.0..=1.0).contains(&cos_arg) {
            return Err(GeometryError::UnreachableLength { length });
        }

        Ok(cos_arg.acos() + self.alpha2() - self.gamma)
    }
}
