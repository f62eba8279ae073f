//! Concentric-shell approximation of a spheroidal background mass.
//!
//! The far field of the galaxy model is not a tree approximation but a fixed
//! list of concentric shells built once per run. Outside a shell the shell
//! theorem applies and the shell acts as a softened point mass at its
//! center; inside, the magnitude falls off linearly with `r / semimajor`,
//! anchored to the point-mass value at the semimajor axis. The linear
//! interior law is a deliberate simplification of the true interior field
//! and is part of the model's contract.

use thiserror::Error;

use crate::simulation::params::SpheroidalParams;
use crate::simulation::states::{normalized, NVec3};

/// Softening floor on squared center distance (kpc^2). A point closer to a
/// shell center than this receives zero force from that shell.
pub const SHELL_SOFTENING_SQ: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum ShellError {
    #[error("shell mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("shell axes must be positive, got semimajor = {semimajor}, semiminor = {semiminor}")]
    NonPositiveAxis { semimajor: f64, semiminor: f64 },

    #[error("shell semiminor axis {semiminor} exceeds semimajor axis {semimajor}")]
    AxesOutOfOrder { semimajor: f64, semiminor: f64 },

    #[error("shell count must be positive")]
    ZeroShellCount,

    #[error("total shell mass must be positive, got {0}")]
    NonPositiveTotalMass(f64),
}

/// One concentric layer of the background spheroid. Immutable for the run.
#[derive(Debug, Clone)]
pub struct Shell {
    pub mass: f64,           // layer mass (1e9 Msun), > 0
    pub semimajor_axis: f64, // equatorial extent (kpc), > 0
    pub semiminor_axis: f64, // polar extent (kpc), 0 < semiminor <= semimajor
    pub center: NVec3,       // shell center (kpc)
}

impl Shell {
    /// Validated constructor. A malformed shell cannot enter the collection;
    /// force evaluation never has to re-check.
    pub fn new(
        mass: f64,
        semimajor_axis: f64,
        semiminor_axis: f64,
        center: NVec3,
    ) -> Result<Self, ShellError> {
        if !(mass > 0.0) {
            return Err(ShellError::NonPositiveMass(mass));
        }
        if !(semimajor_axis > 0.0) || !(semiminor_axis > 0.0) {
            return Err(ShellError::NonPositiveAxis {
                semimajor: semimajor_axis,
                semiminor: semiminor_axis,
            });
        }
        if semiminor_axis > semimajor_axis {
            return Err(ShellError::AxesOutOfOrder {
                semimajor: semimajor_axis,
                semiminor: semiminor_axis,
            });
        }
        Ok(Self {
            mass,
            semimajor_axis,
            semiminor_axis,
            center,
        })
    }

    /// Attractive force this shell exerts at `point`, for gravitational
    /// constant `g`.
    pub fn force_at(&self, point: &NVec3, g: f64) -> NVec3 {
        // Displacement from the point toward the shell center; attraction
        // acts along this direction.
        let to_center = self.center - point;
        let r_sq = to_center.norm_squared();

        // Inside the softening core the shell contributes nothing.
        if r_sq <= SHELL_SOFTENING_SQ {
            return NVec3::zeros();
        }

        let r = r_sq.sqrt();
        let magnitude = if r > self.semimajor_axis {
            // Outside: shell theorem, softened point mass at the center.
            g * self.mass / (r_sq + SHELL_SOFTENING_SQ)
        } else {
            // Inside: linear falloff anchored to the point-mass value at
            // r = semimajor_axis.
            let anchor = g * self.mass
                / (self.semimajor_axis * self.semimajor_axis + SHELL_SOFTENING_SQ);
            anchor * (r / self.semimajor_axis)
        };

        magnitude * normalized(&to_center)
    }
}

/// Total background force at `point` from the whole shell list.
/// Each shell is evaluated independently and summed.
pub fn shell_force(point: &NVec3, shells: &[Shell], g: f64) -> NVec3 {
    shells
        .iter()
        .fold(NVec3::zeros(), |acc, s| acc + s.force_at(point, g))
}

/// Build `shell_count` equal-mass concentric shells approximating the
/// spheroid, called once before a run.
///
/// Outer radii come from a linear partition of `[0, 1.1 * max_axis]`; each
/// shell sits at the midpoint radius of its band with its semiminor axis
/// scaled by the spheroid's `c / a` flattening. Masses sum to `total_mass`.
pub fn make_shells(
    spheroid: &SpheroidalParams,
    shell_count: usize,
    total_mass: f64,
) -> Result<Vec<Shell>, ShellError> {
    if shell_count == 0 {
        return Err(ShellError::ZeroShellCount);
    }
    if !(total_mass > 0.0) {
        return Err(ShellError::NonPositiveTotalMass(total_mass));
    }

    let outer = spheroid.max_axis() * 1.1;
    let band = outer / shell_count as f64;
    let mass_each = total_mass / shell_count as f64;
    let flattening = spheroid.c / spheroid.a;

    let mut shells = Vec::with_capacity(shell_count);
    for i in 0..shell_count {
        let inner_radius = band * i as f64;
        let outer_radius = band * (i + 1) as f64;
        let mid_radius = 0.5 * (inner_radius + outer_radius);
        shells.push(Shell::new(
            mass_each,
            mid_radius,
            mid_radius * flattening,
            NVec3::zeros(),
        )?);
    }
    Ok(shells)
}
