//! Numerical and physical parameters for the simulation.
//!
//! `SimulationParams` holds the runtime settings of the step loop:
//! - adaptive timestep bounds and the CFL stability coefficient,
//! - softening length and gravitational constant,
//! - interaction radius for the localized direct summation,
//! - diagnostics cadence and verbosity.
//!
//! Every constructor here validates eagerly: a non-positive bound, an
//! unordered `[dt_min, dt_max]` pair, or a zero output interval is a fatal
//! configuration error, never silently coerced.

use serde::Deserialize;
use thiserror::Error;

/// Gravitational constant in galactic units: kpc (km/s)^2 / (1e9 Msun).
pub const G_GALACTIC: f64 = 4.499e-6;

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("parameter `{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("dt bounds out of order: dt_min = {dt_min} > dt_max = {dt_max}")]
    DtBoundsOutOfOrder { dt_min: f64, dt_max: f64 },

    #[error("output_interval must be a positive integer")]
    ZeroOutputInterval,
}

fn positive(name: &'static str, value: f64) -> Result<f64, ParamsError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ParamsError::NonPositive { name, value })
    }
}

/// How chatty the orchestrator is on stdout.
/// `silent` prints nothing, `basic` prints run boundaries,
/// `detailed` prints per-diagnostic step summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    Basic,
    Detailed,
}

/// Log-level enumeration carried alongside verbosity.
/// Invalid names are rejected at deserialization, matching the eager
/// validation of the numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// Validated runtime settings, immutable for the whole run.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub dt_min: f64,                 // lower timestep bound (Myr)
    pub dt_max: f64,                 // upper timestep bound (Myr)
    pub cfl: f64,                    // CFL stability coefficient
    pub softening_length: f64,       // timestep regularization scale (kpc)
    pub interaction_radius_kpc: f64, // direct-sum cutoff (kpc)
    pub g: f64,                      // gravitational constant
    pub output_interval: usize,      // diagnostics cadence (steps)
    pub verbosity: Verbosity,
    pub log_level: LogLevel,
}

impl SimulationParams {
    /// Build a validated parameter set. All numeric fields must be positive
    /// and finite, and `dt_min <= dt_max`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dt_min: f64,
        dt_max: f64,
        cfl: f64,
        softening_length: f64,
        interaction_radius_kpc: f64,
        g: f64,
        output_interval: usize,
        verbosity: Verbosity,
        log_level: LogLevel,
    ) -> Result<Self, ParamsError> {
        let dt_min = positive("dt_min", dt_min)?;
        let dt_max = positive("dt_max", dt_max)?;
        if dt_min > dt_max {
            return Err(ParamsError::DtBoundsOutOfOrder { dt_min, dt_max });
        }
        if output_interval == 0 {
            return Err(ParamsError::ZeroOutputInterval);
        }
        Ok(Self {
            dt_min,
            dt_max,
            cfl: positive("cfl", cfl)?,
            softening_length: positive("softening_length", softening_length)?,
            interaction_radius_kpc: positive("interaction_radius_kpc", interaction_radius_kpc)?,
            g: positive("g", g)?,
            output_interval,
            verbosity,
            log_level,
        })
    }
}

/// Spheroid geometry and total mass for the background distribution.
#[derive(Debug, Clone)]
pub struct SpheroidalParams {
    pub a: f64,    // semi-major axis along x (kpc)
    pub b: f64,    // semi-major axis along y (kpc)
    pub c: f64,    // semi-minor axis along z (kpc)
    pub mass: f64, // total mass (1e9 Msun)
}

impl SpheroidalParams {
    pub fn new(a: f64, b: f64, c: f64, mass: f64) -> Result<Self, ParamsError> {
        Ok(Self {
            a: positive("spheroid.a", a)?,
            b: positive("spheroid.b", b)?,
            c: positive("spheroid.c", c)?,
            mass: positive("spheroid.mass", mass)?,
        })
    }

    /// Largest of the three semi-axes.
    pub fn max_axis(&self) -> f64 {
        self.a.max(self.b).max(self.c)
    }
}

/// Target disk configuration consumed once, at the disk-formation step.
#[derive(Debug, Clone)]
pub struct DiskParams {
    pub mass: f64,                // disk mass for the rotation curve (1e9 Msun)
    pub a: f64,                   // radial scale length (kpc)
    pub b: f64,                   // vertical scale length (kpc)
    pub disk_radius: f64,         // outer radius of the formed disk (kpc)
    pub disk_thickness: f64,      // full thickness of the formed disk (kpc)
    pub v_circ_factor: f64,       // circular-velocity scaling
    pub velocity_dispersion: f64, // planar Gaussian dispersion (km/s)
}

impl DiskParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mass: f64,
        a: f64,
        b: f64,
        disk_radius: f64,
        disk_thickness: f64,
        v_circ_factor: f64,
        velocity_dispersion: f64,
    ) -> Result<Self, ParamsError> {
        Ok(Self {
            mass: positive("disk.mass", mass)?,
            a: positive("disk.a", a)?,
            b: positive("disk.b", b)?,
            disk_radius: positive("disk.disk_radius", disk_radius)?,
            disk_thickness: positive("disk.disk_thickness", disk_thickness)?,
            v_circ_factor: positive("disk.v_circ_factor", v_circ_factor)?,
            velocity_dispersion: positive("disk.velocity_dispersion", velocity_dispersion)?,
        })
    }
}

/// Logarithmic spiral-arm perturbation applied right after disk formation.
/// `amplitude_pos`/`amplitude_vel` may be zero to disable the perturbation.
#[derive(Debug, Clone)]
pub struct SpiralParams {
    pub num_arms: u32,      // arm multiplicity m
    pub pitch_angle: f64,   // pitch angle alpha (radians)
    pub pattern_speed: f64, // pattern speed (radians/Myr)
    pub amplitude_pos: f64, // radial displacement amplitude (kpc)
    pub amplitude_vel: f64, // tangential velocity amplitude (km/s)
    pub scale_length: f64,  // radial scale r0 of the arms (kpc)
}

impl SpiralParams {
    pub fn new(
        num_arms: u32,
        pitch_angle: f64,
        pattern_speed: f64,
        amplitude_pos: f64,
        amplitude_vel: f64,
        scale_length: f64,
    ) -> Result<Self, ParamsError> {
        // Amplitudes are allowed to be zero; the geometric fields are not.
        Ok(Self {
            num_arms,
            pitch_angle: positive("spiral.pitch_angle", pitch_angle)?,
            pattern_speed,
            amplitude_pos,
            amplitude_vel,
            scale_length: positive("spiral.scale_length", scale_length)?,
        })
    }
}
