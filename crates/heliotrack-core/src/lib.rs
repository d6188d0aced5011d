//! Shared primitives for the heliotrack workspace: rigid placements,
//! sun geometry helpers, error types, and calibration configuration.
//!
//! Pure Rust library with no engine or I/O dependencies beyond TOML
//! config loading.  All computation is `f64`.

pub mod config;
pub mod error;
pub mod frame;
pub mod sun;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{
        ArmatureConfig, ElevationLinkageConfig, FacetConfig, FieldConfig, HourLinkageConfig,
        JointConfig,
    };
    pub use crate::error::{CalibrationError, ConfigError, GeometryError, HeliotrackError};
    pub use crate::frame::Frame;
    pub use crate::sun::{normalize_angle, sun_direction, DEGREE};
    pub use nalgebra::{Point3, UnitVector3, Vector3};
}

pub use nalgebra;
