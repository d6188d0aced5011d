//! Actuator kinematic models for the heliostat tracking axes.
//!
//! Each tracking axis is driven by a linear actuator through a planar
//! four-bar linkage.  The linkage reduces to a triangle: two fixed
//! structural side lengths and an included angle that follows the joint
//! rotation, so the law of cosines maps joint angle to actuator stroke
//! length in closed form, and back.
//!
//! ```text
//! joint angle (rad) ──► length_from_angle ──► stroke length (m)
//!                  ◄── angle_from_length ◄──
//! ```
//!
//! Models are immutable once constructed and validated at construction,
//! so a bad calibration set fails before any solve.

pub mod elevation;
pub mod hour;
pub mod presets;

pub use elevation::ElevationAngleKm;
pub use hour::HourAngleKm;

use heliotrack_core::error::CalibrationError;

/// Strictly-positive check shared by the model constructors.
pub(crate) fn check_length(name: &'static str, value: f64) -> Result<(), CalibrationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CalibrationError::NonPositiveLength { name, value })
    }
}

/// The linkage triangle must close: the floating link has to be shorter
/// than the two arms it connects.
pub(crate) fn check_assemblable(rab: f64, rbc: f64, rad: f64) -> Result<(), CalibrationError> {
    if rbc < rab + rad {
        Ok(())
    } else {
        Err(CalibrationError::NotAssemblable {
            rbc,
            reach: rab + rad,
        })
    }
}

pub(crate) fn check_offset(offset: f64) -> Result<(), CalibrationError> {
    if offset >= 0.0 {
        Ok(())
    } else {
        Err(CalibrationError::NegativeOffset { value: offset })
    }
}
