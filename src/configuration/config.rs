//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     - run length, disk-formation step, RNG seed
//! - [`ParametersConfig`] - numerical parameters and physical constants
//! - [`SpheroidConfig`]   - background spheroid geometry and shell count
//! - [`PopulationConfig`] - initial star/black-hole population sampling
//! - [`DiskConfig`]       - target disk for the one-time formation step
//! - [`SpiralConfig`]     - spiral-arm perturbation
//! - [`ScenarioConfig`]   - top-level wrapper used to load from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   n_steps: 100
//!   disk_formation_step: 40
//!   seed: 1234
//!
//! parameters:
//!   dt_min: 0.01              # Myr
//!   dt_max: 0.5
//!   cfl: 0.1
//!   softening_length: 0.08    # kpc
//!   interaction_radius_kpc: 2.0
//!   output_interval: 10
//!   verbosity: basic          # silent | basic | detailed
//!   log_level: INFO
//!
//! spheroid:
//!   a: 15.0                   # kpc
//!   b: 15.0
//!   c: 4.0
//!   mass: 80.0                # 1e9 Msun
//!   shell_count: 20
//!
//! population:
//!   num_stars: 50
//!   num_bhs: 3
//!   velocity_dispersion: 50.0 # km/s
//!   bh_mass_min: 40.0
//!   bh_mass_max: 150.0
//!   bh_mass_alpha: 2.35
//!   bh_axis_scale: 0.4
//!
//! disk:
//!   mass: 40.0
//!   a: 4.0
//!   b: 0.2
//!   disk_radius: 12.0
//!   disk_thickness: 0.8
//!   v_circ_factor: 0.9
//!   velocity_dispersion: 15.0
//!
//! spiral:
//!   num_arms: 2
//!   pitch_angle: 0.2
//!   pattern_speed: 0.8
//!   amplitude_pos: 0.05
//!   amplitude_vel: 5.0
//!   scale_length: 4.0
//! ```
//!
//! Scenario building maps this configuration into the validated runtime
//! types; every numeric constraint is checked there, eagerly.

use serde::Deserialize;

use crate::simulation::params::{LogLevel, Verbosity};

/// Run-level settings: how long, when the disk forms, and the seed.
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub n_steps: usize,             // number of integration steps
    pub disk_formation_step: usize, // step index of the one-time transform
    pub seed: u64,                  // deterministic RNG seed for the run
}

/// Numerical parameters and physical constants.
/// `g` defaults to the galactic-unit gravitational constant when omitted.
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt_min: f64,                 // lower timestep bound (Myr)
    pub dt_max: f64,                 // upper timestep bound (Myr)
    pub cfl: f64,                    // CFL stability coefficient
    pub softening_length: f64,       // softening scale (kpc)
    pub interaction_radius_kpc: f64, // direct-sum cutoff (kpc)
    pub g: Option<f64>,              // gravitational constant override
    pub output_interval: usize,      // diagnostics cadence (steps)
    pub verbosity: Verbosity,
    pub log_level: LogLevel,
}

/// Background spheroid geometry, total mass, and shell discretization.
#[derive(Deserialize, Debug, Clone)]
pub struct SpheroidConfig {
    pub a: f64,             // semi-major axis along x (kpc)
    pub b: f64,             // semi-major axis along y (kpc)
    pub c: f64,             // semi-minor axis along z (kpc)
    pub mass: f64,          // total mass (1e9 Msun)
    pub shell_count: usize, // number of equal-mass shells
}

/// Initial particle population sampling.
#[derive(Deserialize, Debug, Clone)]
pub struct PopulationConfig {
    pub num_stars: usize,
    pub num_bhs: usize,
    pub velocity_dispersion: f64, // isotropic Gaussian sigma for stars (km/s)
    pub bh_mass_min: f64,         // bounded power-law mass range (1e9 Msun)
    pub bh_mass_max: f64,
    pub bh_mass_alpha: f64,       // power-law index
    pub bh_axis_scale: f64,       // BH spheroid axes as a fraction of the star spheroid
}

/// Target disk configuration for the formation step.
#[derive(Deserialize, Debug, Clone)]
pub struct DiskConfig {
    pub mass: f64,
    pub a: f64,
    pub b: f64,
    pub disk_radius: f64,
    pub disk_thickness: f64,
    pub v_circ_factor: f64,
    pub velocity_dispersion: f64,
}

/// Spiral-arm perturbation applied right after disk formation.
#[derive(Deserialize, Debug, Clone)]
pub struct SpiralConfig {
    pub num_arms: u32,
    pub pitch_angle: f64,
    pub pattern_speed: f64,
    pub amplitude_pos: f64,
    pub amplitude_vel: f64,
    pub scale_length: f64,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub spheroid: SpheroidConfig,
    pub population: PopulationConfig,
    pub disk: DiskConfig,
    pub spiral: SpiralConfig,
}
