//! Field-calibrated armature and linkage presets.

/// BlueSolar heliostat field calibration.
///
/// Two calibration revisions circulate for the same armature; they differ
/// numerically without a documented supersession, so both are provided as
/// example data and neither is canonical.
pub mod bluesolar {
    use nalgebra::Vector3;

    use heliotrack_armature::{AngleInterval, ArmatureAxis, Facet, TrackerArmature2A};
    use heliotrack_core::error::CalibrationError;

    use crate::{ElevationAngleKm, HourAngleKm};

    /// The BlueSolar armature geometry.
    ///
    /// Primary joint is the elevation axis, secondary the hour-angle
    /// axis; the coordinate system is x east, y north, z zenith, with the
    /// facet facing south at rest.
    pub fn armature() -> Result<TrackerArmature2A, CalibrationError> {
        Ok(TrackerArmature2A::new(
            ArmatureAxis::new(
                Vector3::new(0.0, 0.0, 2.415),
                Vector3::new(-1.0, 0.0, 0.0),
                AngleInterval::from_degrees(0.0, 90.0)?,
                0.0,
            )?,
            ArmatureAxis::new(
                Vector3::new(0.0, -0.0816, 0.0),
                Vector3::new(0.0, 0.0, -1.0),
                AngleInterval::from_degrees(-70.0, 55.0)?,
                0.0,
            )?,
            Facet::new(Vector3::new(0.0, -0.105, 0.035), Vector3::new(0.0, -1.0, 0.0))?,
        ))
    }

    /// Elevation actuator, calibration revision A.
    pub fn elevation_km() -> Result<ElevationAngleKm, CalibrationError> {
        ElevationAngleKm::simple(
            1.499539835163685,
            0.38228347073744173,
            0.0396,
            0.4146341554709371,
            0.08480554835440447,
            0.0,
        )
    }

    /// Hour-angle actuator, calibration revision A.
    pub fn hour_angle_km() -> Result<HourAngleKm, CalibrationError> {
        HourAngleKm::new(
            0.6388776401148127,
            0.34805695317203444,
            0.04225,
            0.33827680301912516,
            0.0,
        )
    }

    /// Elevation actuator, calibration revision B (later field survey,
    /// includes a measured stroke offset).
    pub fn elevation_km_rev_b() -> Result<ElevationAngleKm, CalibrationError> {
        ElevationAngleKm::simple(
            1.5566945190927768,
            0.3679941188052566,
            0.08587871211683747,
            0.45469491923653677,
            0.08155204289894769,
            0.04037,
        )
    }

    /// Hour-angle actuator, calibration revision B.
    pub fn hour_angle_km_rev_b() -> Result<HourAngleKm, CalibrationError> {
        HourAngleKm::new(
            0.543717625543648,
            0.3716059721933388,
            0.05209218963038278,
            0.3390154085801952,
            0.04037,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heliotrack_core::sun::DEGREE;

    #[test]
    fn bluesolar_armature_is_valid() {
        let arm = bluesolar::armature().unwrap();
        assert_eq!(arm.primary().range().min(), 0.0);
        assert_eq!(arm.secondary().range().max(), 55.0 * DEGREE);
    }

    #[test]
    fn bluesolar_linkages_are_valid() {
        assert!(bluesolar::elevation_km().is_ok());
        assert!(bluesolar::hour_angle_km().is_ok());
        assert!(bluesolar::elevation_km_rev_b().is_ok());
        assert!(bluesolar::hour_angle_km_rev_b().is_ok());
    }

    #[test]
    fn both_revisions_cover_their_working_bands() {
        // The elevation linkages cover the primary joint's full 0..90 deg
        // range; the hour linkages fold just past -45 deg, so their
        // working band is narrower than the -70 deg mechanical limit.
        for km in [
            bluesolar::elevation_km().unwrap(),
            bluesolar::elevation_km_rev_b().unwrap(),
        ] {
            for i in 0..=10 {
                let angle = 90.0 * DEGREE * f64::from(i) / 10.0;
                assert!(km.length_from_angle(angle).is_ok(), "elevation {angle}");
            }
        }

        for km in [
            bluesolar::hour_angle_km().unwrap(),
            bluesolar::hour_angle_km_rev_b().unwrap(),
        ] {
            for i in 0..=10 {
                let angle = (-40.0 + 95.0 * f64::from(i) / 10.0) * DEGREE;
                assert!(km.length_from_angle(angle).is_ok(), "hour {angle}");
            }
        }
    }
}
