//! Adaptive-timestep velocity-Verlet integration, split into two stages.
//!
//! A step is: `adaptive_timestep` -> `verlet_kick_drift` (half-kick plus
//! full drift) -> force recomputation at the new positions ->
//! `verlet_half_kick`. The split exposes the point between drift and the
//! second kick where the one-time disk-formation transform runs.
//!
//! One dt is computed per step and reused across both half-kicks and the
//! drift. It is not recomputed at the midpoint; that looseness relative to
//! textbook adaptive-Verlet schemes is the implemented behavior, since
//! changing it would change trajectories.

use crate::simulation::params::SimulationParams;
use crate::simulation::states::{NVec3, System};

/// Derive a stable step size from the current forces and velocities.
///
/// Per-particle acceleration is `force / mass`. The maxima of |a| and |v|
/// are floored at a small epsilon so a system momentarily at rest yields
/// the largest permitted step instead of a division by zero. Candidates:
///
/// - `dt_acc = sqrt(CFL * softening / max_acc)`
/// - `dt_vel = CFL * softening / max_vel`
///
/// The smaller of the two, clamped into `[dt_min, dt_max]`, bounds how far
/// any particle can move or accelerate in one step relative to the
/// softening scale.
pub fn adaptive_timestep(sys: &System, forces: &[NVec3], params: &SimulationParams) -> f64 {
    let mut max_acc_sq: f64 = 0.0;
    let mut max_vel_sq: f64 = 0.0;

    for (p, f) in sys.particles.iter().zip(forces.iter()) {
        let accel = f / p.m;
        max_acc_sq = max_acc_sq.max(accel.norm_squared());
        max_vel_sq = max_vel_sq.max(p.v.norm_squared());
    }

    // Rest floors: avoid dividing by zero when nothing moves yet.
    let max_acc = if max_acc_sq > 0.0 { max_acc_sq.sqrt() } else { 1e-9 };
    let max_vel = if max_vel_sq > 0.0 { max_vel_sq.sqrt() } else { 1e-9 };

    let dt_acc = (params.cfl * params.softening_length / max_acc).sqrt();
    let dt_vel = params.cfl * params.softening_length / max_vel;

    dt_acc.min(dt_vel).clamp(params.dt_min, params.dt_max)
}

/// First Verlet stage: half-kick then full drift, advancing `sys.t`.
///
/// For each particle and its force f at the step's starting position:
/// v_n+1/2 = v_n + (dt/2) * (f / m)
/// x_n+1   = x_n + dt * v_n+1/2
pub fn verlet_kick_drift(sys: &mut System, forces: &[NVec3], dt: f64) {
    let half_dt = 0.5 * dt;

    // Kick: v_n+1/2 = v_n + (dt/2) * a_n
    for (p, f) in sys.particles.iter_mut().zip(forces.iter()) {
        p.v += half_dt * (f / p.m);
    }

    // Drift: x_n+1 = x_n + dt * v_n+1/2
    for p in sys.particles.iter_mut() {
        p.x += dt * p.v;
    }

    // Advance time: t_n+1 = t_n + dt
    sys.t += dt;
}

/// Second Verlet stage: the closing half-kick, with forces evaluated at the
/// drifted positions.
///
/// v_n+1 = v_n+1/2 + (dt/2) * a_n+1
pub fn verlet_half_kick(sys: &mut System, forces: &[NVec3], dt: f64) {
    let half_dt = 0.5 * dt;

    for (p, f) in sys.particles.iter_mut().zip(forces.iter()) {
        p.v += half_dt * (f / p.m);
    }
}
