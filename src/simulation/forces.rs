//! Force contributors for the hybrid gravity model.
//!
//! Defines the `Force` trait and two production terms:
//! - `ShellGravity`: the concentric-shell background field
//! - `LocalizedGravity`: direct pairwise gravity inside an interaction
//!   radius, found through the spatial grid
//!
//! Terms accumulate *forces* (not accelerations): the adaptive timestep
//! controller and both half-kicks divide by the particle mass themselves.

use rayon::prelude::*;

use crate::simulation::shells::{shell_force, Shell};
use crate::simulation::spatial::SpatialGrid;
use crate::simulation::states::{normalized, NVec3, System};

/// Collection of force terms. Each term implements [`Force`] and their
/// contributions are summed into a single force vector per particle.
pub struct ForceSet {
    terms: Vec<Box<dyn Force + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set.
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term.
    pub fn with(mut self, term: impl Force + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total forces for all particles in `sys`.
    /// `out[i]` is set to the sum of contributions from all terms.
    ///
    /// This runs twice per step (once at the old positions, once after the
    /// drift) and dominates the cost of a step.
    pub fn accumulate_forces(&self, sys: &System, out: &mut [NVec3]) {
        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        // Iterate over all force contributors
        for term in &self.terms {
            term.accumulate(sys, out);
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for force sources operating on a [`System`].
/// Implementations add their contribution into `out[i]` for each particle.
/// The particle state is read-only during accumulation; each `out` slot is
/// written by exactly one worker, so terms may fan out internally.
pub trait Force {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]);
}

/// Background force from the concentric-shell spheroid approximation.
///
/// `g` is a field rather than a global so the shell formula can be
/// evaluated under a different constant in isolation; production paths
/// thread the same constant used by the pairwise term.
pub struct ShellGravity {
    pub g: f64,            // gravitational constant
    pub shells: Vec<Shell>, // immutable shell list for the run
}

impl Force for ShellGravity {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]) {
        out.par_iter_mut()
            .zip(sys.particles.par_iter())
            .for_each(|(slot, p)| {
                *slot += shell_force(&p.x, &self.shells, self.g);
            });
    }
}

/// Direct pairwise gravity, summed only over neighbors inside the
/// interaction radius.
///
/// The pairwise law is the unsoftened `G m1 m2 / r^2`; coincident pairs
/// (r = 0) are skipped outright, and a zero radius turns the term off
/// entirely, leaving the shell background as the only force.
pub struct LocalizedGravity {
    pub g: f64,                // gravitational constant
    pub interaction_radius: f64, // direct-sum cutoff (kpc)
}

impl LocalizedGravity {
    /// Pairwise force on particle `i` from its in-radius neighbors.
    fn force_on(&self, i: usize, sys: &System, grid: &SpatialGrid) -> NVec3 {
        let pi = &sys.particles[i];
        let mut force = NVec3::zeros();

        for j in grid.within_radius(&pi.x, self.interaction_radius) {
            // Self-exclusion is by index identity, not by distance.
            if j == i {
                continue;
            }

            let pj = &sys.particles[j];
            let r_vec = pj.x - pi.x;
            let r = r_vec.norm_squared().sqrt();

            // Strictly between zero and the cutoff: coincident pairs are
            // skipped, and the grid's boundary hits at exactly the cutoff
            // stay out of the sum.
            if r > 0.0 && r < self.interaction_radius {
                let magnitude = self.g * pi.m * pj.m / (r * r);
                force += magnitude * normalized(&r_vec);
            }
        }

        force
    }
}

impl Force for LocalizedGravity {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]) {
        let n = sys.particles.len();
        if n == 0 || self.interaction_radius <= 0.0 {
            return;
        }

        let positions: Vec<NVec3> = sys.particles.iter().map(|p| p.x).collect();

        // The grid build is a barrier: it completes before any query runs.
        // After that, per-particle accumulation is embarrassingly parallel;
        // every worker writes only its own slot.
        let grid = SpatialGrid::build(&positions, self.interaction_radius);

        out.par_iter_mut().enumerate().for_each(|(i, slot)| {
            *slot += self.force_on(i, sys, &grid);
        });
    }
}
