//! Sun geometry helpers.
//!
//! Coordinate convention (observed across the tracking field): x > 0 east,
//! y > 0 north, z > 0 zenith.  Azimuth is 0 at north, positive towards
//! east; elevation is 0 at the horizon, positive towards zenith.

use nalgebra::{UnitVector3, Vector3};
use std::f64::consts::{PI, TAU};

/// One degree in radians.
pub const DEGREE: f64 = PI / 180.0;

/// Mean sun-earth distance in meters.
pub const ASTRONOMICAL_UNIT: f64 = 149_597_870_700.0;

/// Unit vector pointing towards the sun for the given azimuth and
/// elevation, both in radians.
pub fn sun_direction(azimuth: f64, elevation: f64) -> UnitVector3<f64> {
    let (sin_az, cos_az) = azimuth.sin_cos();
    let (sin_el, cos_el) = elevation.sin_cos();
    UnitVector3::new_normalize(Vector3::new(cos_el * sin_az, cos_el * cos_az, sin_el))
}

/// Wrap `phi` into the range `[phi0, phi0 + 2π)`.
pub fn normalize_angle(phi: f64, phi0: f64) -> f64 {
    phi - TAU * ((phi - phi0) / TAU).floor()
}

/// Solar declination in radians for a day number (1 = January 1st),
/// Spencer's Fourier series.
pub fn solar_declination(day_number: u32) -> f64 {
    let omega = TAU / 365.0 * f64::from(day_number - 1);
    let two_omega = 2.0 * omega;
    let three_omega = 3.0 * omega;

    0.006918 - 0.399912 * omega.cos() + 0.070257 * omega.sin() - 0.006758 * two_omega.cos()
        + 0.000907 * two_omega.sin()
        - 0.002697 * three_omega.cos()
        + 0.001480 * three_omega.sin()
}

/// Sun-earth distance in meters for a day number (1 = January 1st).
pub fn sun_earth_distance(day_number: u32) -> f64 {
    let omega = TAU / 365.0 * f64::from(day_number - 1);
    let two_omega = 2.0 * omega;

    let one_over_r2 = 1.00011
        + 0.034221 * omega.cos()
        + 0.00128 * omega.sin()
        + 0.000719 * two_omega.cos()
        + 0.000077 * two_omega.sin();

    (ASTRONOMICAL_UNIT * ASTRONOMICAL_UNIT / one_over_r2).sqrt()
}
