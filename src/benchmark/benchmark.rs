use std::time::Instant;

use crate::simulation::forces::{ForceSet, LocalizedGravity, ShellGravity};
use crate::simulation::integrator::{adaptive_timestep, verlet_half_kick, verlet_kick_drift};
use crate::simulation::params::{
    LogLevel, SimulationParams, SpheroidalParams, Verbosity, G_GALACTIC,
};
use crate::simulation::shells::{make_shells, Shell};
use crate::simulation::states::{NVec3, Particle, System};

/// Helper to build a deterministic star cloud of size `n`, no rand needed
fn make_system(n: usize) -> System {
    let mut particles = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );

        particles.push(Particle::star(x, NVec3::zeros(), 1.0));
    }

    System::new(particles)
}

/// Parameter template shared by the benchmarks
fn bench_params() -> SimulationParams {
    SimulationParams {
        dt_min: 0.01,
        dt_max: 0.5,
        cfl: 0.1,
        softening_length: 0.08,
        interaction_radius_kpc: 2.0,
        g: G_GALACTIC,
        output_interval: 10,
        verbosity: Verbosity::Silent,
        log_level: LogLevel::Info,
    }
}

fn bench_shells() -> Vec<Shell> {
    let spheroid = SpheroidalParams {
        a: 15.0,
        b: 15.0,
        c: 4.0,
        mass: 80.0,
    };
    make_shells(&spheroid, 20, spheroid.mass).expect("benchmark shells are valid")
}

/// Time one force evaluation across system sizes, shell background alone
/// versus the full hybrid set.
pub fn bench_forces() {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let sys = make_system(n);
        let params = bench_params();
        let mut out = vec![NVec3::zeros(); n];

        let shells_only = ForceSet::new().with(ShellGravity {
            g: params.g,
            shells: bench_shells(),
        });

        let hybrid = ForceSet::new()
            .with(ShellGravity {
                g: params.g,
                shells: bench_shells(),
            })
            .with(LocalizedGravity {
                g: params.g,
                interaction_radius: params.interaction_radius_kpc,
            });

        // Warm up
        shells_only.accumulate_forces(&sys, &mut out);
        hybrid.accumulate_forces(&sys, &mut out);

        // Time shell background alone
        let t0 = Instant::now();
        shells_only.accumulate_forces(&sys, &mut out);
        let dt_shells = t0.elapsed().as_secs_f64();

        // Time shells + localized direct sum
        let t1 = Instant::now();
        hybrid.accumulate_forces(&sys, &mut out);
        let dt_hybrid = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, shells = {dt_shells:8.6} s, hybrid = {dt_hybrid:8.6} s");
    }
}

/// Time a full adaptive step (dt + both force evaluations + both kicks)
/// across system sizes. Paste the output into a spreadsheet to graph.
pub fn bench_step() {
    println!("N,step_ms");

    let params = bench_params();
    let steps = 3;

    for n in [200, 400, 800, 1600, 3200, 6400] {
        let mut sys = make_system(n);

        let force_set = ForceSet::new()
            .with(ShellGravity {
                g: params.g,
                shells: bench_shells(),
            })
            .with(LocalizedGravity {
                g: params.g,
                interaction_radius: params.interaction_radius_kpc,
            });

        let mut forces = vec![NVec3::zeros(); n];
        let mut forces_next = vec![NVec3::zeros(); n];

        let mut one_step = |sys: &mut System, forces: &mut Vec<NVec3>, forces_next: &mut Vec<NVec3>| {
            let dt = adaptive_timestep(sys, forces, &params);
            verlet_kick_drift(sys, forces, dt);
            force_set.accumulate_forces(sys, forces_next);
            verlet_half_kick(sys, forces_next, dt);
            std::mem::swap(forces, forces_next);
        };

        // Opening forces + warm-up step
        force_set.accumulate_forces(&sys, &mut forces);
        one_step(&mut sys, &mut forces, &mut forces_next);

        let t0 = Instant::now();
        for _ in 0..steps {
            one_step(&mut sys, &mut forces, &mut forces_next);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{n},{ms:.6}");
    }
}
