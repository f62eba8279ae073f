//! Per-run diagnostics record and its calculators.
//!
//! A run owns exactly one `Diagnostics` value and returns it; there is no
//! process-wide accumulator to clear between runs. The engine records at
//! the configured `output_interval` cadence. Values only; plotting and
//! persistence are the caller's business.

use crate::simulation::states::{NVec3, System};

/// Radial bins for the rotation-curve and density samples.
const PROFILE_BINS: usize = 20;

/// Mean tangential star speed per radial bin (cylindrical radius).
#[derive(Debug, Clone, Default)]
pub struct RotationCurve {
    pub radii: Vec<f64>,  // bin-center radii (kpc)
    pub speeds: Vec<f64>, // mean |v_phi| per bin (km/s), 0 for empty bins
}

/// Black-hole number density per spherical radial bin.
#[derive(Debug, Clone, Default)]
pub struct RadialDensityProfile {
    pub radii: Vec<f64>,     // bin-center radii (kpc)
    pub densities: Vec<f64>, // count / shell volume (kpc^-3)
}

/// Everything the surrounding tooling consumes after a run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub star_positions: Vec<Vec<NVec3>>,          // star snapshot per record
    pub rotation_curves: Vec<RotationCurve>,
    pub bh_density_profiles: Vec<RadialDensityProfile>,
    pub star_counts: Vec<usize>,
    pub velocity_dispersions: Vec<f64>,           // std of star speeds (km/s)
    pub bh_total_masses: Vec<f64>,                // summed BH mass (1e9 Msun)
    pub max_bh_masses: Vec<f64>,                  // largest BH mass (1e9 Msun)
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record for the current system state.
    pub fn record(&mut self, sys: &System) {
        self.star_positions
            .push(sys.stars().map(|p| p.x).collect());
        self.rotation_curves.push(rotation_curve(sys));
        self.bh_density_profiles.push(bh_radial_density(sys));
        self.star_counts.push(sys.stars().count());
        self.velocity_dispersions.push(velocity_dispersion(sys));
        self.bh_total_masses
            .push(sys.black_holes().map(|p| p.m).sum());
        self.max_bh_masses.push(max_bh_mass(sys));
    }

    /// Number of records taken so far.
    pub fn len(&self) -> usize {
        self.star_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.star_counts.is_empty()
    }
}

/// Radially-binned mean tangential speed of the star population.
/// Empty when there are no stars or they all sit on the z axis.
pub fn rotation_curve(sys: &System) -> RotationCurve {
    let max_r = sys
        .stars()
        .map(|p| (p.x.x * p.x.x + p.x.y * p.x.y).sqrt())
        .fold(0.0_f64, f64::max);
    if max_r == 0.0 {
        return RotationCurve::default();
    }

    let bin_width = max_r / PROFILE_BINS as f64;
    let mut sums = vec![0.0; PROFILE_BINS];
    let mut counts = vec![0usize; PROFILE_BINS];

    for p in sys.stars() {
        let r = (p.x.x * p.x.x + p.x.y * p.x.y).sqrt();
        if r == 0.0 {
            continue;
        }
        // Tangential component of the velocity at azimuth phi.
        let phi = p.x.y.atan2(p.x.x);
        let v_phi = -p.v.x * phi.sin() + p.v.y * phi.cos();

        let bin = ((r / bin_width) as usize).min(PROFILE_BINS - 1);
        sums[bin] += v_phi.abs();
        counts[bin] += 1;
    }

    let radii = (0..PROFILE_BINS)
        .map(|i| (i as f64 + 0.5) * bin_width)
        .collect();
    let speeds = sums
        .iter()
        .zip(counts.iter())
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();

    RotationCurve { radii, speeds }
}

/// Black-hole count over spherical-shell volume, per radial bin.
/// Empty when there are no black holes or they all sit at the origin.
pub fn bh_radial_density(sys: &System) -> RadialDensityProfile {
    let max_r = sys
        .black_holes()
        .map(|p| p.x.norm_squared().sqrt())
        .fold(0.0_f64, f64::max);
    if max_r == 0.0 {
        return RadialDensityProfile::default();
    }

    let bin_width = max_r / PROFILE_BINS as f64;
    let mut counts = vec![0usize; PROFILE_BINS];
    for p in sys.black_holes() {
        let r = p.x.norm_squared().sqrt();
        let bin = ((r / bin_width) as usize).min(PROFILE_BINS - 1);
        counts[bin] += 1;
    }

    let mut radii = Vec::with_capacity(PROFILE_BINS);
    let mut densities = Vec::with_capacity(PROFILE_BINS);
    for (i, &count) in counts.iter().enumerate() {
        let r_in = i as f64 * bin_width;
        let r_out = r_in + bin_width;
        let volume = 4.0 / 3.0 * std::f64::consts::PI * (r_out.powi(3) - r_in.powi(3));
        radii.push(r_in + 0.5 * bin_width);
        densities.push(count as f64 / volume);
    }

    RadialDensityProfile { radii, densities }
}

/// Standard deviation of star speeds; zero for fewer than one star.
pub fn velocity_dispersion(sys: &System) -> f64 {
    let speeds: Vec<f64> = sys.stars().map(|p| p.v.norm_squared().sqrt()).collect();
    if speeds.is_empty() {
        return 0.0;
    }
    let mean = speeds.iter().sum::<f64>() / speeds.len() as f64;
    let variance = speeds.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / speeds.len() as f64;
    variance.sqrt()
}

/// Largest black-hole mass, zero when there are none.
pub fn max_bh_mass(sys: &System) -> f64 {
    sys.black_holes().map(|p| p.m).fold(0.0, f64::max)
}
