use galsim::simulation::disk::form_disk;
use galsim::simulation::engine;
use galsim::simulation::forces::{ForceSet, LocalizedGravity, ShellGravity};
use galsim::simulation::integrator::{adaptive_timestep, verlet_half_kick, verlet_kick_drift};
use galsim::simulation::params::{
    DiskParams, LogLevel, SimulationParams, SpiralParams, Verbosity,
};
use galsim::simulation::shells::{shell_force, Shell, SHELL_SOFTENING_SQ};
use galsim::simulation::states::{NVec3, Particle, System};

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Build a two-particle System: `a` at the origin, `b` at (dist, 0, 0)
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    let a = Particle::star(NVec3::zeros(), NVec3::zeros(), m1);
    let b = Particle::star(NVec3::new(dist, 0.0, 0.0), NVec3::zeros(), m2);
    System::new(vec![a, b])
}

/// Default physics parameters for tests
pub fn test_params() -> SimulationParams {
    SimulationParams {
        dt_min: 1e-6,
        dt_max: 0.5,
        cfl: 0.1,
        softening_length: 0.08,
        interaction_radius_kpc: 2.0,
        g: 0.1,
        output_interval: 1,
        verbosity: Verbosity::Silent,
        log_level: LogLevel::Info,
    }
}

/// Build a localized-gravity-only ForceSet
pub fn gravity_set(p: &SimulationParams) -> ForceSet {
    ForceSet::new().with(LocalizedGravity {
        g: p.g,
        interaction_radius: p.interaction_radius_kpc,
    })
}

fn example_shells() -> Vec<Shell> {
    vec![
        Shell::new(40.0, 5.0, 3.0, NVec3::zeros()).unwrap(),
        Shell::new(40.0, 10.0, 6.0, NVec3::zeros()).unwrap(),
    ]
}

fn test_disk_params() -> DiskParams {
    DiskParams {
        mass: 40.0,
        a: 4.0,
        b: 0.2,
        disk_radius: 12.0,
        disk_thickness: 0.8,
        v_circ_factor: 0.9,
        velocity_dispersion: 15.0,
    }
}

/// Spiral settings with both amplitudes zeroed, so the perturbation is a no-op
fn flat_spiral_params() -> SpiralParams {
    SpiralParams {
        num_arms: 2,
        pitch_angle: 0.2,
        pattern_speed: 0.8,
        amplitude_pos: 0.0,
        amplitude_vel: 0.0,
        scale_length: 4.0,
    }
}

// ==================================================================================
// Force accumulator tests
// ==================================================================================

#[test]
fn single_particle_feels_exactly_the_shell_force() {
    let p = test_params();
    let shells = example_shells();
    let sys = System::new(vec![Particle::star(
        NVec3::new(12.0, 0.0, 0.0),
        NVec3::zeros(),
        1.0,
    )]);

    let forces = ForceSet::new()
        .with(ShellGravity {
            g: p.g,
            shells: shells.clone(),
        })
        .with(LocalizedGravity {
            g: p.g,
            interaction_radius: p.interaction_radius_kpc,
        });

    let mut out = vec![NVec3::zeros(); 1];
    forces.accumulate_forces(&sys, &mut out);

    // No pairwise partner exists, so the total must be the background alone:
    // no self-term leaks in.
    let expected = shell_force(&sys.particles[0].x, &shells, p.g);
    assert_relative_eq!(out[0].x, expected.x, max_relative = 1e-14);
    assert_relative_eq!(out[0].y, expected.y, max_relative = 1e-14);
    assert_relative_eq!(out[0].z, expected.z, max_relative = 1e-14);
}

#[test]
fn two_body_direct_force_magnitude_and_direction() {
    let p = test_params();
    let sys = two_body_system(1.0, 1.0, 100.0);
    let forces = gravity_set(&p);

    let mut out = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(&sys, &mut out);

    // Force on the light particle: G * 1 * 100 / 1^2, straight along +x.
    assert_relative_eq!(out[0].x, p.g * 100.0, max_relative = 1e-12);
    assert_relative_eq!(out[0].y, 0.0);
    assert_relative_eq!(out[0].z, 0.0);

    // Equal and opposite on the heavy one.
    assert_relative_eq!(out[1].x, -out[0].x, max_relative = 1e-12);
}

#[test]
fn pairwise_forces_cancel_pairwise() {
    let p = test_params();
    let sys = two_body_system(1.5, 2.0, 3.0);
    let forces = gravity_set(&p);

    let mut out = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(&sys, &mut out);

    let net = out[0] + out[1];
    assert!(net.norm() < 1e-12, "net force not zero: {net:?}");
}

#[test]
fn neighbors_outside_the_interaction_radius_do_not_contribute() {
    let p = test_params();
    // Separation beyond the 2 kpc cutoff: no pairwise term at all.
    let sys = two_body_system(5.0, 1.0, 100.0);
    let forces = gravity_set(&p);

    let mut out = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(&sys, &mut out);

    assert_eq!(out[0], NVec3::zeros());
    assert_eq!(out[1], NVec3::zeros());
}

#[test]
fn coincident_particles_are_skipped_not_divided_by_zero() {
    let p = test_params();
    let x = NVec3::new(1.0, 2.0, 3.0);
    let sys = System::new(vec![
        Particle::star(x, NVec3::zeros(), 1.0),
        Particle::star(x, NVec3::zeros(), 5.0),
    ]);
    let forces = gravity_set(&p);

    let mut out = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(&sys, &mut out);

    assert!(out[0].x.is_finite());
    assert_eq!(out[0], NVec3::zeros());
    assert_eq!(out[1], NVec3::zeros());
}

#[test]
fn zero_interaction_radius_leaves_shell_force_only() {
    let p = test_params();
    let shells = example_shells();
    let sys = two_body_system(0.5, 1.0, 100.0);

    let hybrid = ForceSet::new()
        .with(ShellGravity {
            g: p.g,
            shells: shells.clone(),
        })
        .with(LocalizedGravity {
            g: p.g,
            interaction_radius: 0.0,
        });

    let mut out = vec![NVec3::zeros(); 2];
    hybrid.accumulate_forces(&sys, &mut out);

    for (i, slot) in out.iter().enumerate() {
        let expected = shell_force(&sys.particles[i].x, &shells, p.g);
        assert_relative_eq!(slot.x, expected.x, max_relative = 1e-14);
    }
}

#[test]
fn empty_system_accumulates_nothing() {
    let p = test_params();
    let sys = System::new(Vec::new());
    let forces = gravity_set(&p);
    let mut out: Vec<NVec3> = Vec::new();
    forces.accumulate_forces(&sys, &mut out);
    assert!(out.is_empty());
}

// ==================================================================================
// Shell background tests
// ==================================================================================

#[test]
fn shell_outside_behaves_as_softened_point_mass() {
    // Isolated evaluation of the shell formula under g = 1.
    let shell = Shell::new(100.0, 5.0, 3.0, NVec3::zeros()).unwrap();
    let point = NVec3::new(12.0, 0.0, 0.0);

    let force = shell.force_at(&point, 1.0);
    let expected_mag = 100.0 / (144.0 + SHELL_SOFTENING_SQ);

    // Attractive: pointing from the probe back toward the center.
    assert_relative_eq!(force.x, -expected_mag, max_relative = 1e-12);
    assert_relative_eq!(force.y, 0.0);
    assert_relative_eq!(force.z, 0.0);
}

#[test]
fn shell_inside_falls_off_linearly_from_the_anchor() {
    let shell = Shell::new(100.0, 5.0, 3.0, NVec3::zeros()).unwrap();

    let at_edge = shell.force_at(&NVec3::new(5.0, 0.0, 0.0), 1.0).norm();
    let at_half = shell.force_at(&NVec3::new(2.5, 0.0, 0.0), 1.0).norm();

    // Anchor at the semimajor axis, halved at half the radius.
    let anchor = 100.0 / (25.0 + SHELL_SOFTENING_SQ);
    assert_relative_eq!(at_edge, anchor, max_relative = 1e-12);
    assert_relative_eq!(at_half, 0.5 * at_edge, max_relative = 1e-12);
}

#[test]
fn shell_collection_sums_each_shell_independently() {
    let shells = example_shells();
    let point = NVec3::new(7.0, -1.0, 2.0);

    let total = shell_force(&point, &shells, 1.0);
    let by_hand = shells[0].force_at(&point, 1.0) + shells[1].force_at(&point, 1.0);

    assert_relative_eq!(total.x, by_hand.x, max_relative = 1e-14);
    assert_relative_eq!(total.y, by_hand.y, max_relative = 1e-14);
    assert_relative_eq!(total.z, by_hand.z, max_relative = 1e-14);
}

// ==================================================================================
// Adaptive timestep tests
// ==================================================================================

#[test]
fn adaptive_dt_is_always_clamped() {
    let p = test_params();
    let sys = two_body_system(0.1, 1.0, 100.0);

    // Strong force at close separation.
    let forces = vec![
        NVec3::new(1e6, 0.0, 0.0),
        NVec3::new(-1e6, 0.0, 0.0),
    ];
    let dt = adaptive_timestep(&sys, &forces, &p);
    assert!(dt >= p.dt_min && dt <= p.dt_max, "dt {dt} out of bounds");

    // Weak force, slow system: the other end of the clamp.
    let forces = vec![
        NVec3::new(1e-12, 0.0, 0.0),
        NVec3::new(-1e-12, 0.0, 0.0),
    ];
    let dt = adaptive_timestep(&sys, &forces, &p);
    assert!(dt >= p.dt_min && dt <= p.dt_max, "dt {dt} out of bounds");
}

#[test]
fn adaptive_dt_at_rest_is_dt_max() {
    let p = test_params();
    let sys = two_body_system(10.0, 1.0, 1.0);
    let forces = vec![NVec3::zeros(); 2];

    let dt = adaptive_timestep(&sys, &forces, &p);
    assert_relative_eq!(dt, p.dt_max);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn constant_force_half_kicks_combine_into_one_full_kick() {
    let mut sys = two_body_system(10.0, 2.0, 4.0);
    sys.particles[0].v = NVec3::new(1.0, -1.0, 0.5);

    let f = NVec3::new(0.4, 0.0, -0.2);
    let forces = vec![f; 2];
    let dt = 0.01;

    let v0: Vec<NVec3> = sys.particles.iter().map(|p| p.v).collect();
    let x0: Vec<NVec3> = sys.particles.iter().map(|p| p.x).collect();

    // Constant field: the same forces are valid at both evaluation points.
    verlet_kick_drift(&mut sys, &forces, dt);
    verlet_half_kick(&mut sys, &forces, dt);

    for (i, p) in sys.particles.iter().enumerate() {
        // Velocity: exactly one explicit-Euler kick of dt * f / m.
        let v_expected = v0[i] + dt * (f / p.m);
        assert_relative_eq!(p.v.x, v_expected.x, max_relative = 1e-12);
        assert_relative_eq!(p.v.y, v_expected.y, max_relative = 1e-12);
        assert_relative_eq!(p.v.z, v_expected.z, max_relative = 1e-12);

        // Position: drifted on the half-kicked velocity.
        let x_expected = x0[i] + dt * (v0[i] + 0.5 * dt * (f / p.m));
        assert_relative_eq!(p.x.x, x_expected.x, max_relative = 1e-12);
    }

    // The drift advanced the clock by exactly dt.
    assert_relative_eq!(sys.t, dt);
}

// ==================================================================================
// Disk formation tests
// ==================================================================================

#[test]
fn disk_formation_moves_stars_into_bounds_and_spares_black_holes() {
    let mut particles = Vec::new();
    for i in 0..30 {
        let f = i as f64;
        particles.push(Particle::star(
            NVec3::new((f * 0.7).sin() * 14.0, (f * 0.3).cos() * 14.0, (f * 0.1).sin() * 3.0),
            NVec3::new(f, -f, 0.5 * f),
            1.0,
        ));
    }
    let bh_x = NVec3::new(0.5, -0.25, 0.1);
    let bh_v = NVec3::new(10.0, 20.0, -5.0);
    particles.push(Particle::black_hole(bh_x, bh_v, 80.0));

    let mut sys = System::new(particles);
    let disk = test_disk_params();
    let spiral = flat_spiral_params();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    form_disk(&mut sys, &disk, &spiral, 0.1, &mut rng);

    for p in sys.stars() {
        let r = (p.x.x * p.x.x + p.x.y * p.x.y).sqrt();
        assert!(r <= disk.disk_radius + 1e-12, "star radius {r} outside disk");
        assert!(
            p.x.z.abs() <= disk.disk_thickness / 2.0 + 1e-12,
            "star height {} outside disk",
            p.x.z
        );
    }

    let bh = sys.black_holes().next().unwrap();
    assert_eq!(bh.x, bh_x);
    assert_eq!(bh.v, bh_v);
}

// ==================================================================================
// End-to-end orchestration tests
// ==================================================================================

#[test]
fn one_step_pulls_an_isolated_pair_together() {
    let mut p = test_params();
    p.dt_max = 1e-3; // clamp fixes dt for the single step

    let sys = two_body_system(1.0, 1.0, 100.0);
    let (final_sys, diagnostics) = engine::run(
        1,
        &sys.particles,
        Vec::new(),
        &p,
        0, // no disk formation
        &test_disk_params(),
        &flat_spiral_params(),
        4242,
    );

    let a = &final_sys.particles[0];
    let b = &final_sys.particles[1];

    // Both ends moved measurably toward each other.
    assert!(a.x.x > 0.0, "light particle did not move inward");
    assert!(b.x.x < 1.0, "heavy particle did not move inward");
    let gap = b.x.x - a.x.x;
    assert!(gap < 1.0 && gap > 0.0);

    // Isolated pair, no shells: Newton's third law keeps total momentum.
    let momentum = a.m * a.v + b.m * b.v;
    assert!(momentum.norm() < 1e-12, "momentum drifted: {momentum:?}");

    // output_interval = 1: the single step was recorded.
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn diagnostics_respect_the_output_cadence() {
    let mut p = test_params();
    p.output_interval = 5;

    let sys = two_body_system(10.0, 1.0, 1.0); // beyond the cutoff: forces stay zero
    let (final_sys, diagnostics) = engine::run(
        10,
        &sys.particles,
        Vec::new(),
        &p,
        0,
        &test_disk_params(),
        &flat_spiral_params(),
        7,
    );

    assert_eq!(diagnostics.len(), 2); // steps 5 and 10
    assert_eq!(diagnostics.star_counts, vec![2, 2]);
    // Free drift of a resting pair: ten dt_max steps on the clock.
    assert_relative_eq!(final_sys.t, 10.0 * p.dt_max, max_relative = 1e-12);
}

#[test]
fn disk_formation_triggers_exactly_once_mid_run() {
    let mut p = test_params();
    p.dt_max = 1e-3;

    let mut particles = Vec::new();
    for i in 0..10 {
        let f = i as f64;
        particles.push(Particle::star(
            NVec3::new((f * 0.9).sin() * 14.0, (f * 0.4).cos() * 14.0, 2.0),
            NVec3::zeros(),
            1.0,
        ));
    }

    let disk = test_disk_params();
    let (final_sys, _) = engine::run(
        3,
        &particles,
        Vec::new(),
        &p,
        2, // form the disk on the middle step
        &disk,
        &flat_spiral_params(),
        99,
    );

    // Every star was pulled out of z = 2.0 into the thin disk, and the
    // remaining steps cannot have drifted them far at dt = 1e-3.
    for star in final_sys.stars() {
        assert!(star.x.z.abs() < disk.disk_thickness);
    }
}
