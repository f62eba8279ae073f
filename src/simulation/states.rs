//! Core state types for the galaxy simulation.
//!
//! Defines the particle/system structs:
//! - `Particle` using `NVec3`, tagged `Star` or `BlackHole`
//! - `System` holding the particle list and the current simulation time `t`
//!
//! Units follow the galactic convention used throughout the crate:
//! positions in kpc, velocities in km/s, masses in 1e9 solar masses.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

/// Unit vector along `v`, or the zero vector when `v` has zero norm.
///
/// The zero-norm guard is load-bearing: force directions are derived from
/// displacements that can legitimately be zero (coincident positions), and
/// those must contribute nothing rather than NaN.
pub fn normalized(v: &NVec3) -> NVec3 {
    let norm_sq = v.norm_squared();
    if norm_sq == 0.0 {
        NVec3::zeros()
    } else {
        v / norm_sq.sqrt()
    }
}

/// Which population a particle belongs to.
///
/// Both kinds share the same state layout; the tag only decides which subset
/// participates in disk formation and in the black-hole diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Star,
    BlackHole,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec3, // position (kpc)
    pub v: NVec3, // velocity (km/s)
    pub m: f64,   // mass (1e9 Msun), > 0
    pub kind: ParticleKind,
}

impl Particle {
    pub fn star(x: NVec3, v: NVec3, m: f64) -> Self {
        Self { x, v, m, kind: ParticleKind::Star }
    }

    pub fn black_hole(x: NVec3, v: NVec3, m: f64) -> Self {
        Self { x, v, m, kind: ParticleKind::BlackHole }
    }

    pub fn is_star(&self) -> bool {
        self.kind == ParticleKind::Star
    }

    pub fn is_black_hole(&self) -> bool {
        self.kind == ParticleKind::BlackHole
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub particles: Vec<Particle>, // collection of stars and black holes
    pub t: f64,                   // time (Myr)
}

impl System {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles, t: 0.0 }
    }

    /// Iterate over the star subset.
    pub fn stars(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_star())
    }

    /// Iterate over the black-hole subset.
    pub fn black_holes(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_black_hole())
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
