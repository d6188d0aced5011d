//! Heliostat tracking CLI.
//!
//! Provides two modes of operation:
//! - `angles`: Solve tracking angles and actuator strokes for a sun
//!   position and aiming point
//! - `aiming-point`: Recover the reflected aiming point on a target
//!   plane from measured actuator strokes

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nalgebra::{Point3, Vector3};

use heliotrack_armature::{Angles, SolveStatus, TrackerArmature2A, TrackerTarget};
use heliotrack_core::config::FieldConfig;
use heliotrack_core::frame::Frame;
use heliotrack_core::sun::{sun_direction, DEGREE};
use heliotrack_linkage::presets::bluesolar;
use heliotrack_linkage::{ElevationAngleKm, HourAngleKm};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Heliostat sun-tracking kinematics.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Calibration TOML; defaults to the BlueSolar field calibration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve tracking angles and actuator strokes for a sun position.
    Angles {
        /// Heliostat pivot position in the field frame (m).
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [0.0, 0.0, 0.0])]
        heliostat: Vec<f64>,

        /// Aiming point in the field frame (m).
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, required = true)]
        aim: Vec<f64>,

        /// Sun azimuth, degrees clockwise from north.
        #[arg(long, allow_negative_numbers = true)]
        azimuth: f64,

        /// Sun elevation above the horizon, degrees.
        #[arg(long, allow_negative_numbers = true)]
        elevation: f64,
    },

    /// Recover the reflected aiming point from measured actuator strokes.
    AimingPoint {
        /// Heliostat pivot position in the field frame (m).
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true, default_values_t = [0.0, 0.0, 0.0])]
        heliostat: Vec<f64>,

        /// Sun azimuth, degrees clockwise from north.
        #[arg(long, allow_negative_numbers = true)]
        azimuth: f64,

        /// Sun elevation above the horizon, degrees.
        #[arg(long, allow_negative_numbers = true)]
        elevation: f64,

        /// Elevation actuator stroke length (m).
        #[arg(long)]
        elevation_length: f64,

        /// Hour-angle actuator stroke length (m).
        #[arg(long)]
        hour_length: f64,

        /// North coordinate of the vertical target plane (m).
        #[arg(long, allow_negative_numbers = true)]
        target_y: f64,
    },
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// One heliostat's calibrated kinematics: armature plus both actuators.
struct Rig {
    armature: TrackerArmature2A,
    elevation_km: ElevationAngleKm,
    hour_km: HourAngleKm,
}

impl Rig {
    fn load(config: Option<&PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = config else {
            log::debug!("No calibration file given, using BlueSolar presets");
            return Ok(Self {
                armature: bluesolar::armature()?,
                elevation_km: bluesolar::elevation_km()?,
                hour_km: bluesolar::hour_angle_km()?,
            });
        };

        let field = FieldConfig::from_toml_file(path)
            .with_context(|| format!("loading calibration from {}", path.display()))?;
        Ok(Self {
            armature: TrackerArmature2A::from_config(&field.armature)?,
            elevation_km: ElevationAngleKm::from_config(&field.elevation_linkage)?,
            hour_km: HourAngleKm::from_config(&field.hour_linkage)?,
        })
    }
}

fn point3(values: &[f64]) -> anyhow::Result<Point3<f64>> {
    anyhow::ensure!(values.len() == 3, "expected three coordinates");
    Ok(Point3::new(values[0], values[1], values[2]))
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_angles(
    rig: &Rig,
    heliostat: Point3<f64>,
    aim: Point3<f64>,
    azimuth: f64,
    elevation: f64,
) -> anyhow::Result<()> {
    let to_global = Frame::translation(heliostat.x, heliostat.y, heliostat.z);
    let sun = sun_direction(azimuth * DEGREE, elevation * DEGREE);

    let mut target = TrackerTarget::new(aim);
    let status = rig.armature.update(&to_global, &sun.into_inner(), &mut target)?;

    let (primary_deg, secondary_deg) = target.angles;
    if let SolveStatus::OutOfLimits { primary, secondary } = status {
        for (violated, name) in [(primary, "elevation"), (secondary, "hour-angle")] {
            if violated {
                log::warn!("Solved {name} angle violates the joint limits");
            }
        }
    }

    println!("elevation angle:  {primary_deg:11.6} deg");
    println!("hour angle:       {secondary_deg:11.6} deg");
    println!(
        "elevation stroke: {:11.6} m",
        rig.elevation_km.length_from_angle(primary_deg * DEGREE)?
    );
    println!(
        "hour stroke:      {:11.6} m",
        rig.hour_km.length_from_angle(secondary_deg * DEGREE)?
    );
    Ok(())
}

fn run_aiming_point(
    rig: &Rig,
    heliostat: Point3<f64>,
    azimuth: f64,
    elevation: f64,
    elevation_length: f64,
    hour_length: f64,
    target_y: f64,
) -> anyhow::Result<()> {
    let angles = Angles::new(
        rig.elevation_km.angle_from_length(elevation_length)?,
        rig.hour_km.angle_from_length(hour_length)?,
    );
    log::info!(
        "Strokes decode to elevation {:.4} deg, hour angle {:.4} deg",
        angles.primary / DEGREE,
        angles.secondary / DEGREE
    );

    let to_global = Frame::translation(heliostat.x, heliostat.y, heliostat.z);
    let facet_point = to_global.transform_point(&rig.armature.facet_point(angles));
    let normal = to_global.transform_direction(&rig.armature.facet_normal(angles));

    let sun = sun_direction(azimuth * DEGREE, elevation * DEGREE).into_inner();
    let reflected: Vector3<f64> = 2.0 * sun.dot(&normal) * normal - sun;
    anyhow::ensure!(
        reflected.y.abs() > 1e-9,
        "reflected ray is parallel to the target plane"
    );

    let k = (target_y - facet_point.y) / reflected.y;
    if k < 0.0 {
        log::warn!("Target plane is behind the mirror, extending the ray backwards");
    }
    let point = facet_point + k * reflected;

    println!("aiming point: [{:.4}, {:.4}, {:.4}] m", point.x, point.y, point.z);
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let mut config = simplelog::ConfigBuilder::new();
    config.set_target_level(log::LevelFilter::Off);
    config.set_location_level(log::LevelFilter::Off);
    config.set_time_level(log::LevelFilter::Off);

    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    simplelog::TermLogger::init(
        level,
        config.build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let rig = Rig::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Angles {
            heliostat,
            aim,
            azimuth,
            elevation,
        } => run_angles(&rig, point3(&heliostat)?, point3(&aim)?, azimuth, elevation),
        Commands::AimingPoint {
            heliostat,
            azimuth,
            elevation,
            elevation_length,
            hour_length,
            target_y,
        } => run_aiming_point(
            &rig,
            point3(&heliostat)?,
            azimuth,
            elevation,
            elevation_length,
            hour_length,
            target_y,
        ),
    }
}
