//! Per-step orchestration of a simulation run.
//!
//! The step sequence is: adapt dt from the current forces, half-kick and
//! drift, apply the one-time disk-formation transform at its configured
//! step, recompute forces at the drifted positions, close with the second
//! half-kick, then record diagnostics at the output cadence.
//!
//! Forces are evaluated exactly twice per step: the closing evaluation of
//! one step is threaded into the next as its opening forces, so the loop
//! never recomputes a third, redundant set. Each phase finishes before the
//! next begins; only the force accumulation itself fans out internally.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::simulation::diagnostics::Diagnostics;
use crate::simulation::disk::form_disk;
use crate::simulation::forces::{ForceSet, LocalizedGravity, ShellGravity};
use crate::simulation::integrator::{adaptive_timestep, verlet_half_kick, verlet_kick_drift};
use crate::simulation::params::{DiskParams, SimulationParams, SpiralParams, Verbosity};
use crate::simulation::shells::Shell;
use crate::simulation::states::{NVec3, Particle, System};

/// Run-level settings: step count, disk-formation trigger, RNG seed.
#[derive(Debug, Clone)]
pub struct Engine {
    pub n_steps: usize,             // fixed number of steps for the run
    pub disk_formation_step: usize, // step index of the one-time transform
    pub seed: u64,                  // deterministic seed for the run's RNG
}

/// Drive a complete run and return the final particle set together with
/// the run's own diagnostics record.
///
/// The initial particles are copied; the caller's set is untouched.
/// Particles are never created or destroyed during the run, so the force
/// buffers are allocated once up front.
#[allow(clippy::too_many_arguments)]
pub fn run(
    n_steps: usize,
    initial_particles: &[Particle],
    shells: Vec<Shell>,
    params: &SimulationParams,
    disk_formation_step: usize,
    disk: &DiskParams,
    spiral: &SpiralParams,
    rng_seed: u64,
) -> (System, Diagnostics) {
    let mut sys = System::new(initial_particles.to_vec());
    let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
    let mut diagnostics = Diagnostics::new();

    let force_set = ForceSet::new()
        .with(ShellGravity {
            g: params.g,
            shells,
        })
        .with(LocalizedGravity {
            g: params.g,
            interaction_radius: params.interaction_radius_kpc,
        });

    let n = sys.len();
    let mut forces = vec![NVec3::zeros(); n];
    let mut forces_next = vec![NVec3::zeros(); n];

    if params.verbosity >= Verbosity::Basic {
        println!(
            "starting run: {} particles ({} stars, {} black holes), {} steps",
            n,
            sys.stars().count(),
            sys.black_holes().count(),
            n_steps
        );
    }

    // Opening force evaluation; every later step reuses the forces carried
    // over from its predecessor's closing evaluation.
    force_set.accumulate_forces(&sys, &mut forces);

    for step in 1..=n_steps {
        let dt = adaptive_timestep(&sys, &forces, params);

        // Stage 1: half-kick on the opening forces, then the full drift.
        verlet_kick_drift(&mut sys, &forces, dt);

        // The one-time transform runs after the drift and before the
        // closing force evaluation of the same step.
        if step == disk_formation_step {
            form_disk(&mut sys, disk, spiral, params.g, &mut rng);
            if params.verbosity >= Verbosity::Basic {
                println!("step {step}: disk formed");
            }
        }

        // Stage 2: forces at the drifted positions, closing half-kick.
        force_set.accumulate_forces(&sys, &mut forces_next);
        verlet_half_kick(&mut sys, &forces_next, dt);

        // Thread the closing forces into the next step.
        std::mem::swap(&mut forces, &mut forces_next);

        if step % params.output_interval == 0 {
            diagnostics.record(&sys);
            if params.verbosity >= Verbosity::Detailed {
                println!(
                    "step {step}: dt = {dt:.4}, t = {:.2}, stars = {}, max BH mass = {:.2}",
                    sys.t,
                    sys.stars().count(),
                    crate::simulation::diagnostics::max_bh_mass(&sys),
                );
            }
        }
    }

    if params.verbosity >= Verbosity::Basic {
        println!("run complete: t = {:.2} Myr after {} steps", sys.t, n_steps);
    }

    (sys, diagnostics)
}
