//! Periodic angle interval for revolute joint limits.

use std::f64::consts::TAU;

use heliotrack_core::error::CalibrationError;
use heliotrack_core::sun::{normalize_angle, DEGREE};

/// A joint's mechanical angle range, treated as periodic with period 2π.
///
/// Angles are first wrapped into `[min, min + 2π)` and then checked
/// against `max`, so a range like `[-70°, 55°]` rejects `-90°` even
/// though `-90° ≡ 270°` lies inside the wrapped period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleInterval {
    min: f64,
    max: f64,
}

impl AngleInterval {
    /// New interval from limits in radians.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::EmptyAngleRange`] when `min >= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, CalibrationError> {
        if min >= max {
            return Err(CalibrationError::EmptyAngleRange {
                min_deg: min / DEGREE,
                max_deg: max / DEGREE,
            });
        }
        Ok(Self { min, max })
    }

    /// New interval from limits in degrees.
    pub fn from_degrees(min_deg: f64, max_deg: f64) -> Result<Self, CalibrationError> {
        Self::new(min_deg * DEGREE, max_deg * DEGREE)
    }

    /// Lower limit (radians).
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper limit (radians).
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Wrap `angle` into `[min, min + 2π)`.
    pub fn normalize(&self, angle: f64) -> f64 {
        normalize_angle(angle, self.min)
    }

    /// Whether `angle` (already normalized) lies within the limits.
    pub fn contains(&self, angle: f64) -> bool {
        self.min <= angle && angle <= self.max
    }

    /// The representative of `angle`'s 2π-equivalence class nearest the
    /// interval.  In-limits angles come back wrapped; out-of-limits
    /// angles come back on the side of the closer bound, so a caller
    /// clamping to the limits clamps towards the right end.
    pub fn closest_representative(&self, angle: f64) -> f64 {
        let wrapped = self.normalize(angle);
        if self.contains(wrapped) {
            return wrapped;
        }
        // wrapped > max: one representative sits past max, the other a
        // full turn down, below min.
        if wrapped - self.max <= self.min - (wrapped - TAU) {
            wrapped
        } else {
            wrapped - TAU
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    #[test]
    fn rejects_empty_range() {
        assert!(AngleInterval::from_degrees(10.0, 10.0).is_err());
        assert!(AngleInterval::from_degrees(20.0, -20.0).is_err());
    }

    #[test]
    fn normalize_wraps_below_min() {
        let range = AngleInterval::from_degrees(-70.0, 55.0).unwrap();
        let wrapped = range.normalize(-90.0 * DEGREE);
        assert_relative_eq!(wrapped, -90.0 * DEGREE + TAU, epsilon = 1e-12);
        assert!(!range.contains(wrapped));
    }

    #[test]
    fn normalize_keeps_in_range_angles() {
        let range = AngleInterval::from_degrees(-70.0, 55.0).unwrap();
        let a = 30.0 * DEGREE;
        assert_relative_eq!(range.normalize(a), a, epsilon = 1e-12);
        assert!(range.contains(range.normalize(a)));
    }

    #[test]
    fn full_turn_aliases_are_accepted() {
        let range = AngleInterval::from_degrees(0.0, 90.0).unwrap();
        let wrapped = range.normalize(45.0 * DEGREE + TAU);
        assert_relative_eq!(wrapped, 45.0 * DEGREE, epsilon = 1e-12);
        assert!(range.contains(wrapped));
    }

    #[test]
    fn closest_representative_sides_with_the_nearer_bound() {
        let range = AngleInterval::from_degrees(0.0, 90.0).unwrap();

        // In limits: plain wrap.
        let inside = range.closest_representative(45.0 * DEGREE + TAU);
        assert_relative_eq!(inside, 45.0 * DEGREE, epsilon = 1e-12);

        // Just below min: stays negative instead of surfacing as 350 deg.
        let below = range.closest_representative(-10.0 * DEGREE);
        assert_relative_eq!(below, -10.0 * DEGREE, epsilon = 1e-12);

        // Just past max: stays past max.
        let above = range.closest_representative(100.0 * DEGREE);
        assert_relative_eq!(above, 100.0 * DEGREE, epsilon = 1e-12);

        // Far side of the circle: whichever bound is closer wins.
        let far = range.closest_representative(300.0 * DEGREE);
        assert_relative_eq!(far, -60.0 * DEGREE, epsilon = 1e-12);
    }

    #[test]
    fn contains_is_inclusive_at_limits() {
        let range = AngleInterval::from_degrees(0.0, 90.0).unwrap();
        assert!(range.contains(0.0));
        assert!(range.contains(90.0 * DEGREE));
        assert!(!range.contains(90.1 * DEGREE));
    }
}
