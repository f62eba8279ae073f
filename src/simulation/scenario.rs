//! Build fully-initialized simulation scenarios from configuration.
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - run settings (`Engine`)
//! - validated numerical parameters (`SimulationParams`)
//! - the sampled initial particle population (`System` at t = 0)
//! - the concentric-shell background and the disk/spiral parameters
//!
//! Stars are drawn uniformly from the spheroid with isotropic Gaussian
//! velocities and unit mass; black holes come from a scaled spheroid with
//! half the velocity dispersion and bounded power-law masses. All numeric
//! constraints are checked here, before a run can start.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::configuration::config::{PopulationConfig, ScenarioConfig};
use crate::simulation::disk::gauss;
use crate::simulation::engine::Engine;
use crate::simulation::params::{
    DiskParams, ParamsError, SimulationParams, SpheroidalParams, SpiralParams, G_GALACTIC,
};
use crate::simulation::shells::{make_shells, Shell, ShellError};
use crate::simulation::states::{NVec3, Particle, System};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Shells(#[from] ShellError),

    #[error("black-hole mass bounds out of order: min = {min}, max = {max}")]
    BhMassBoundsOutOfOrder { min: f64, max: f64 },

    #[error("black-hole mass bounds must be positive, got min = {0}")]
    NonPositiveBhMass(f64),

    #[error("black-hole mass power-law index must exceed 1, got {0}")]
    BhMassAlphaTooSmall(f64),

    #[error("bh_axis_scale must be positive, got {0}")]
    NonPositiveAxisScale(f64),

    #[error("population velocity_dispersion must be positive, got {0}")]
    NonPositiveDispersion(f64),
}

/// A fully-initialized runtime bundle, ready to hand to the engine.
pub struct Scenario {
    pub engine: Engine,
    pub params: SimulationParams,
    pub system: System,
    pub shells: Vec<Shell>,
    pub disk: DiskParams,
    pub spiral: SpiralParams,
}

impl Scenario {
    /// Map the YAML-facing configuration into validated runtime types and
    /// sample the initial population.
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        let p = &cfg.parameters;
        let params = SimulationParams::new(
            p.dt_min,
            p.dt_max,
            p.cfl,
            p.softening_length,
            p.interaction_radius_kpc,
            p.g.unwrap_or(G_GALACTIC),
            p.output_interval,
            p.verbosity,
            p.log_level,
        )?;

        let spheroid = SpheroidalParams::new(
            cfg.spheroid.a,
            cfg.spheroid.b,
            cfg.spheroid.c,
            cfg.spheroid.mass,
        )?;
        let shells = make_shells(&spheroid, cfg.spheroid.shell_count, spheroid.mass)?;

        let d = &cfg.disk;
        let disk = DiskParams::new(
            d.mass,
            d.a,
            d.b,
            d.disk_radius,
            d.disk_thickness,
            d.v_circ_factor,
            d.velocity_dispersion,
        )?;

        let s = &cfg.spiral;
        let spiral = SpiralParams::new(
            s.num_arms,
            s.pitch_angle,
            s.pattern_speed,
            s.amplitude_pos,
            s.amplitude_vel,
            s.scale_length,
        )?;

        let mut rng = ChaCha8Rng::seed_from_u64(cfg.engine.seed);
        let particles = sample_population(&cfg.population, &spheroid, &mut rng)?;

        let engine = Engine {
            n_steps: cfg.engine.n_steps,
            disk_formation_step: cfg.engine.disk_formation_step,
            seed: cfg.engine.seed,
        };

        Ok(Self {
            engine,
            params,
            system: System::new(particles),
            shells,
            disk,
            spiral,
        })
    }

    /// Consume the bundle and drive the full run.
    pub fn run(self) -> (System, crate::simulation::diagnostics::Diagnostics) {
        crate::simulation::engine::run(
            self.engine.n_steps,
            &self.system.particles,
            self.shells,
            &self.params,
            self.engine.disk_formation_step,
            &self.disk,
            &self.spiral,
            self.engine.seed,
        )
    }
}

/// Sample the initial star and black-hole populations.
pub fn sample_population(
    pop: &PopulationConfig,
    spheroid: &SpheroidalParams,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Particle>, ConfigError> {
    if !(pop.velocity_dispersion > 0.0) {
        return Err(ConfigError::NonPositiveDispersion(pop.velocity_dispersion));
    }
    if !(pop.bh_mass_min > 0.0) {
        return Err(ConfigError::NonPositiveBhMass(pop.bh_mass_min));
    }
    if pop.bh_mass_min > pop.bh_mass_max {
        return Err(ConfigError::BhMassBoundsOutOfOrder {
            min: pop.bh_mass_min,
            max: pop.bh_mass_max,
        });
    }
    if !(pop.bh_mass_alpha > 1.0) {
        return Err(ConfigError::BhMassAlphaTooSmall(pop.bh_mass_alpha));
    }
    if !(pop.bh_axis_scale > 0.0) {
        return Err(ConfigError::NonPositiveAxisScale(pop.bh_axis_scale));
    }

    let mut particles = Vec::with_capacity(pop.num_stars + pop.num_bhs);

    // Stars: unit mass, uniform in the spheroid, isotropic Gaussian velocity.
    for _ in 0..pop.num_stars {
        let x = random_in_spheroid(spheroid.a, spheroid.b, spheroid.c, rng);
        let v = NVec3::new(
            gauss(rng, pop.velocity_dispersion),
            gauss(rng, pop.velocity_dispersion),
            gauss(rng, pop.velocity_dispersion),
        );
        particles.push(Particle::star(x, v, 1.0));
    }

    // Black holes: scaled spheroid, half the dispersion, power-law masses.
    let bh_a = spheroid.a * pop.bh_axis_scale;
    let bh_b = spheroid.b * pop.bh_axis_scale;
    let bh_c = spheroid.c * pop.bh_axis_scale;
    let bh_sigma = pop.velocity_dispersion * 0.5;

    for _ in 0..pop.num_bhs {
        let x = random_in_spheroid(bh_a, bh_b, bh_c, rng);
        let v = NVec3::new(gauss(rng, bh_sigma), gauss(rng, bh_sigma), gauss(rng, bh_sigma));
        let m = bounded_pareto(rng, pop.bh_mass_alpha - 1.0, pop.bh_mass_min, pop.bh_mass_max);
        particles.push(Particle::black_hole(x, v, m));
    }

    Ok(particles)
}

/// Uniform rejection sampling inside a spheroid with semi-axes a, b, c.
fn random_in_spheroid(a: f64, b: f64, c: f64, rng: &mut ChaCha8Rng) -> NVec3 {
    loop {
        let x = (2.0 * rng.gen::<f64>() - 1.0) * a;
        let y = (2.0 * rng.gen::<f64>() - 1.0) * b;
        let z = (2.0 * rng.gen::<f64>() - 1.0) * c;
        if x * x / (a * a) + y * y / (b * b) + z * z / (c * c) <= 1.0 {
            return NVec3::new(x, y, z);
        }
    }
}

/// Pareto draw with unit scale and the given shape, restricted to
/// `[min, max]` by inverse-CDF sampling over the truncated range.
fn bounded_pareto(rng: &mut ChaCha8Rng, shape: f64, min: f64, max: f64) -> f64 {
    // CDF of the unit-scale Pareto: F(x) = 1 - x^(-shape).
    let lower = 1.0 - min.powf(-shape);
    let upper = 1.0 - max.powf(-shape);
    let u = lower + rng.gen::<f64>() * (upper - lower);
    (1.0 - u).powf(-1.0 / shape)
}
