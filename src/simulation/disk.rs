//! One-time disk-formation transform.
//!
//! At the configured step, every star is relocated into a rotating disk:
//! positions drawn uniformly over the disk area (with uniform thickness),
//! velocities set to a rotation-curve-consistent circular speed plus
//! Gaussian dispersion, followed by a logarithmic spiral-arm perturbation.
//! Black holes are untouched. The transform runs between the drift and the
//! second force evaluation of its step.

use std::f64::consts::TAU;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::simulation::params::{DiskParams, SpiralParams};
use crate::simulation::states::{NVec3, System};

/// Gaussian draw with the given standard deviation.
pub(crate) fn gauss(rng: &mut ChaCha8Rng, sigma: f64) -> f64 {
    let unit: f64 = rng.sample(StandardNormal);
    sigma * unit
}

/// Random point in a disk, uniform in area, uniform in z.
pub fn random_in_disk(radius: f64, thickness: f64, rng: &mut ChaCha8Rng) -> NVec3 {
    // sqrt(u) makes the radial draw uniform per unit area.
    let r = rng.gen::<f64>().sqrt() * radius;
    let theta = TAU * rng.gen::<f64>();
    let z = rng.gen_range(-thickness / 2.0..=thickness / 2.0);
    NVec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Reposition every star into the disk and assign its disk velocity.
///
/// The circular speed comes from the disk's rotation curve,
/// `v_circ_factor * sqrt(G M / sqrt(r^2 + a^2 + b^2))`, tangential at the
/// star's new azimuth, with Gaussian dispersion in the plane and a fifth
/// of it vertically. The spiral perturbation is applied afterwards.
pub fn form_disk(
    sys: &mut System,
    disk: &DiskParams,
    spiral: &SpiralParams,
    g: f64,
    rng: &mut ChaCha8Rng,
) {
    let sigma = disk.velocity_dispersion;

    for p in sys.particles.iter_mut().filter(|p| p.is_star()) {
        let pos = random_in_disk(disk.disk_radius, disk.disk_thickness, rng);
        p.x = pos;

        let r = (pos.x * pos.x + pos.y * pos.y).sqrt();
        let v_circ = disk.v_circ_factor
            * (g * disk.mass / (r * r + disk.a * disk.a + disk.b * disk.b).sqrt()).sqrt();

        let phi = pos.y.atan2(pos.x);
        p.v = NVec3::new(
            -v_circ * phi.sin() + gauss(rng, sigma),
            v_circ * phi.cos() + gauss(rng, sigma),
            gauss(rng, sigma * 0.2),
        );
    }

    add_spiral_perturbation(sys, spiral);
}

/// Perturb star positions and velocities along logarithmic spiral arms.
///
/// Phase along the arms is `m*phi - ln(r/r0)/tan(alpha)`; stars get a radial
/// displacement `A_pos*cos(phase)`, the matching azimuthal shift, and a
/// tangential velocity perturbation `A_vel*sin(phase)`. Stars exactly on the
/// axis (r = 0) are left alone.
fn add_spiral_perturbation(sys: &mut System, spiral: &SpiralParams) {
    let m = spiral.num_arms as f64;
    let tan_alpha = spiral.pitch_angle.tan();

    for p in sys.particles.iter_mut().filter(|p| p.is_star()) {
        let r = (p.x.x * p.x.x + p.x.y * p.x.y).sqrt();
        if r == 0.0 {
            continue;
        }
        let phi = p.x.y.atan2(p.x.x);
        let phase = m * phi - (r / spiral.scale_length).ln() / tan_alpha;

        let delta_r = spiral.amplitude_pos * phase.cos();
        let new_r = (r + delta_r).max(0.0);

        let delta_phi = -(spiral.amplitude_pos / (r * tan_alpha)) * phase.cos();
        let new_phi = phi + delta_phi;

        p.x = NVec3::new(new_r * new_phi.cos(), new_r * new_phi.sin(), p.x.z);

        let delta_v = spiral.amplitude_vel * phase.sin();
        p.v = NVec3::new(
            p.v.x - delta_v * new_phi.sin(),
            p.v.y + delta_v * new_phi.cos(),
            p.v.z,
        );
    }
}
