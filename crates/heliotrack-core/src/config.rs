//! Calibration configuration loaded from TOML.
//!
//! These are plain-data mirrors of the typed calibration objects in the
//! `heliotrack-armature` and `heliotrack-linkage` crates.  Validation
//! happens when the typed objects are built from a config, so bad
//! calibration surfaces before any solve is attempted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_offset() -> f64 {
    0.0
}
const fn default_angle_deg() -> f64 {
    0.0
}

// ---------------------------------------------------------------------------
// Armature
// ---------------------------------------------------------------------------

/// One revolute joint of the armature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    /// Translation offset of the joint from its parent frame (m).
    pub shift: [f64; 3],

    /// Rotation axis in the parent frame (need not be normalized).
    pub axis: [f64; 3],

    /// Mechanical angle limits [min, max] in degrees.
    pub angle_range_deg: [f64; 2],

    /// Rest angle in degrees (default: 0).
    #[serde(default = "default_angle_deg")]
    pub default_angle_deg: f64,
}

/// Mirror facet mounted at the end of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetConfig {
    /// Facet center offset in the secondary joint's frame (m).
    pub shift: [f64; 3],

    /// Outward facet normal in the secondary joint's frame.
    pub normal: [f64; 3],
}

/// Full two-axis armature geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmatureConfig {
    pub primary: JointConfig,
    pub secondary: JointConfig,
    pub facet: FacetConfig,
}

// ---------------------------------------------------------------------------
// Linkages
// ---------------------------------------------------------------------------

/// Elevation actuator linkage; the tag selects the linkage topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElevationLinkageConfig {
    /// Plain four-bar linkage with a calibrated phase angle.
    Simple {
        gamma: f64,
        rab: f64,
        rbc: f64,
        rad: f64,
        alpha2: f64,
        #[serde(default = "default_offset")]
        offset: f64,
    },

    /// Four-bar linkage with an auxiliary crank of perpendicular arms.
    AuxCrank {
        gamma: f64,
        rab: f64,
        rbc: f64,
        rad: f64,
        ra: f64,
        rd: f64,
    },
}

/// Hour-angle actuator linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourLinkageConfig {
    pub gamma: f64,
    pub rab: f64,
    pub rbc: f64,
    pub rad: f64,
    #[serde(default = "default_offset")]
    pub offset: f64,
}

// ---------------------------------------------------------------------------
// FieldConfig
// ---------------------------------------------------------------------------

/// Complete per-heliostat calibration: armature geometry plus both
/// actuator linkages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub armature: ArmatureConfig,
    pub elevation_linkage: ElevationLinkageConfig,
    pub hour_linkage: HourLinkageConfig,
}

impl FieldConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a config from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_TOML: &str = r#"
        [armature.primary]
        shift = [0.0, 0.0, 2.415]
        axis = [-1.0, 0.0, 0.0]
        angle_range_deg = [0.0, 90.0]

        [armature.secondary]
        shift = [0.0, -0.0816, 0.0]
        axis = [0.0, 0.0, -1.0]
        angle_range_deg = [-70.0, 55.0]
        default_angle_deg = 0.0

        [armature.facet]
        shift = [0.0, -0.105, 0.035]
        normal = [0.0, -1.0, 0.0]

        [elevation_linkage]
        kind = "simple"
        gamma = 1.499539835163685
        rab = 0.38228347073744173
        rbc = 0.0396
        rad = 0.4146341554709371
        alpha2 = 0.08480554835440447

        [hour_linkage]
        gamma = 0.6388776401148127
        rab = 0.34805695317203444
        rbc = 0.04225
        rad = 0.33827680301912516
        offset = 0.0
    "#;

    #[test]
    fn parses_example_toml() {
        let cfg = FieldConfig::from_toml_str(EXAMPLE_TOML).unwrap();
        assert_eq!(cfg.armature.primary.shift, [0.0, 0.0, 2.415]);
        assert_eq!(cfg.armature.secondary.angle_range_deg, [-70.0, 55.0]);
        assert!(matches!(
            cfg.elevation_linkage,
            ElevationLinkageConfig::Simple { .. }
        ));
    }

    #[test]
    fn elevation_offset_defaults_to_zero() {
        let cfg = FieldConfig::from_toml_str(EXAMPLE_TOML).unwrap();
        match cfg.elevation_linkage {
            ElevationLinkageConfig::Simple { offset, .. } => assert_eq!(offset, 0.0),
            ElevationLinkageConfig::AuxCrank { .. } => panic!("wrong linkage kind"),
        }
    }

    #[test]
    fn parses_aux_crank_linkage() {
        let toml = r#"
            kind = "aux_crank"
            gamma = 1.5839
            rab = 0.39254
            rbc = 0.0465
            rad = 0.43061
            ra = 0.082
            rd = 0.045
        "#;
        let cfg: ElevationLinkageConfig = toml::from_str(toml).unwrap();
        assert!(matches!(cfg, ElevationLinkageConfig::AuxCrank { .. }));
    }

    #[test]
    fn toml_round_trip() {
        let cfg = FieldConfig::from_toml_str(EXAMPLE_TOML).unwrap();
        let serialized = toml::to_string(&cfg).unwrap();
        let back = FieldConfig::from_toml_str(&serialized).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn rejects_unknown_linkage_kind() {
        let toml = r#"
            kind = "pentagonal"
            gamma = 1.0
            rab = 1.0
            rbc = 1.0
            rad = 1.0
        "#;
        assert!(toml::from_str::<ElevationLinkageConfig>(toml).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FieldConfig::from_toml_file("/nonexistent/heliotrack.toml").unwrap_err();
        assert!(matches!(err, crate::error::ConfigError::Io(_)));
    }
}
