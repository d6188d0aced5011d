//! Hour-angle-axis actuator model.
//!
//! Single observed topology: a four-bar linkage whose included angle
//! tracks the hour angle through `sin(angle - gamma)`, plus a static
//! stroke offset.

use heliotrack_core::config::HourLinkageConfig;
use heliotrack_core::error::{CalibrationError, GeometryError};

use crate::{check_assemblable, check_length, check_offset};

/// Kinematic model of the hour-angle actuator: joint angle (radians) to
/// stroke length (meters) and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourAngleKm {
    gamma: f64,
    rab: f64,
    rbc: f64,
    rad: f64,
    offset: f64,
}

impl HourAngleKm {
    /// # Errors
    ///
    /// [`CalibrationError`] when an arm length is non-positive, the
    /// triangle cannot close, or `offset` is negative.
    pub fn new(
        gamma: f64,
        rab: f64,
        rbc: f64,
        rad: f64,
        offset: f64,
    ) -> Result<Self, CalibrationError> {
        check_length("rab", rab)?;
        check_length("rbc", rbc)?;
        check_length("rad", rad)?;
        check_assemblable(rab, rbc, rad)?;
        check_offset(offset)?;
        Ok(Self {
            gamma,
            rab,
            rbc,
            rad,
            offset,
        })
    }

    /// Build from a calibration config.
    pub fn from_config(cfg: &HourLinkageConfig) -> Result<Self, CalibrationError> {
        Self::new(cfg.gamma, cfg.rab, cfg.rbc, cfg.rad, cfg.offset)
    }

    /// Realizable joint angle range `(gamma - π/2, gamma + π/2)` over
    /// which the two conversions are mutual inverses and the length is
    /// strictly monotonic.
    pub fn realizable_range(&self) -> (f64, f64) {
        (
            self.gamma - std::f64::consts::FRAC_PI_2,
            self.gamma + std::f64::consts::FRAC_PI_2,
        )
    }

    /// Actuator stroke length (m) for an hour angle (radians).
    ///
    /// # Errors
    ///
    /// [`GeometryError::UnreachableAngle`] when the linkage cannot reach
    /// the requested angle.
    pub fn length_from_angle(&self, angle: f64) -> Result<f64, GeometryError> {
        let rab2 = self.rab * self.rab;
        let rad2 = self.rad * self.rad;
        let rbc2 = self.rbc * self.rbc;

        let y_square =
            rab2 + rad2 - rbc2 + 2.0 * self.rab * self.rad * (angle - self.gamma).sin();
        if y_square < 0.0 {
            return Err(GeometryError::UnreachableAngle { angle });
        }

        let length = y_square.sqrt() - self.offset;
        if length <= 0.0 {
            return Err(GeometryError::UnreachableAngle { angle });
        }
        Ok(length)
    }

    /// Hour angle (radians) for an actuator stroke length (m).
    ///
    /// # Errors
    ///
    /// [`GeometryError::UnreachableLength`] when no triangle closes at
    /// this length.
    pub fn angle_from_length(&self, length: f64) -> Result<f64, GeometryError> {
        let rab2 = self.rab * self.rab;
        let rad2 = self.rad * self.rad;
        let rbc2 = self.rbc * self.rbc;
        let y = length + self.offset;

        let sin_arg = (rbc2 + y * y - rab2 - rad2) / (2.0 * self.rab * self.rad);
        if !(-1.0..=1.0).contains(&sin_arg) {
            return Err(GeometryError::UnreachableLength { length });
        }

        Ok(self.gamma + sin_arg.asin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use heliotrack_core::sun::DEGREE;

    // Field calibration revision A.
    fn rev_a() -> HourAngleKm {
        HourAngleKm::new(
            0.6388776401148127,
            0.34805695317203444,
            0.04225,
            0.33827680301912516,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn negative_arm_length_fails_at_construction() {
        let err = HourAngleKm::new(0.6, 0.35, -0.04, 0.34, 0.0).unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::NonPositiveLength { name: "rbc", .. }
        ));
    }

    #[test]
    fn round_trip_across_the_realizable_range() {
        let km = rev_a();
        let (lo, hi) = km.realizable_range();
        for i in 1..20 {
            let angle = lo + (hi - lo) * f64::from(i) / 20.0;
            let Ok(length) = km.length_from_angle(angle) else {
                continue;
            };
            let back = km.angle_from_length(length).unwrap();
            assert_relative_eq!(back, angle, epsilon = 1e-9);
        }
    }

    #[test]
    fn length_is_strictly_monotonic_over_working_range() {
        let km = rev_a();
        // -40..55 deg sits inside revision A's working band; the linkage
        // folds near -45 deg.
        let mut previous = km.length_from_angle(-40.0 * DEGREE).unwrap();
        for i in -39..=55 {
            let length = km.length_from_angle(f64::from(i) * DEGREE).unwrap();
            assert!(
                length > previous,
                "length not strictly monotonic at {i} deg: {length} vs {previous}"
            );
            previous = length;
        }
    }

    #[test]
    fn angle_at_the_fold_is_unreachable_not_nan() {
        let km = rev_a();
        // sin(angle - gamma) = -1 drives the squared length negative for
        // this calibration.
        let err = km
            .length_from_angle(km.gamma - std::f64::consts::FRAC_PI_2)
            .unwrap_err();
        assert!(matches!(err, GeometryError::UnreachableAngle { .. }));
    }

    #[test]
    fn length_outside_the_triangle_is_unreachable_not_nan() {
        let km = rev_a();
        assert!(matches!(
            km.angle_from_length(5.0).unwrap_err(),
            GeometryError::UnreachableLength { length } if length == 5.0
        ));
    }

    #[test]
    fn from_config_matches_direct_construction() {
        let cfg = HourLinkageConfig {
            gamma: 0.6388776401148127,
            rab: 0.34805695317203444,
            rbc: 0.04225,
            rad: 0.33827680301912516,
            offset: 0.0,
        };
        assert_eq!(HourAngleKm::from_config(&cfg).unwrap(), rev_a());
    }
}
