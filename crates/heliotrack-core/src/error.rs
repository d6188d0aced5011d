use thiserror::Error;

/// Top-level error type for the heliotrack workspace.
#[derive(Debug, Error)]
pub enum HeliotrackError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors produced while solving tracking geometry.
///
/// Copy + static payloads for cheap propagation out of the solve path.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("Reflection bisector is degenerate: sun and aiming directions are anti-parallel")]
    DegenerateBisector,

    #[error("Rotation axes are parallel: the two-axis decomposition is singular")]
    ParallelAxes,

    #[error("No armature orientation reflects onto the aiming point")]
    NoSolution,

    #[error("Angle {angle} rad is not realizable by the linkage")]
    UnreachableAngle { angle: f64 },

    #[error("Length {length} m is not realizable by the linkage")]
    UnreachableLength { length: f64 },

    #[error("Matrix bottom row is not [0, 0, 0, 1]")]
    NonAffineMatrix,

    #[error("Rotation block is not orthonormal (max deviation {deviation})")]
    NonRigidRotation { deviation: f64 },
}

/// Invalid calibration constants, rejected at construction time.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Linkage length {name} must be strictly positive, got {value}")]
    NonPositiveLength { name: &'static str, value: f64 },

    #[error("Linkage is not assemblable: rbc = {rbc} must be shorter than rab + rad = {reach}")]
    NotAssemblable { rbc: f64, reach: f64 },

    #[error("Stroke offset must be non-negative, got {value}")]
    NegativeOffset { value: f64 },

    #[error("Crank arms cannot fold into a phase: |ra - rd| = {difference} must be shorter than rad = {rad}")]
    UnfoldableCrank { difference: f64, rad: f64 },

    #[error("Vector {name} must be non-zero")]
    ZeroVector { name: &'static str },

    #[error("Empty angle range: min = {min_deg} deg, max = {max_deg} deg")]
    EmptyAngleRange { min_deg: f64, max_deg: f64 },
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
