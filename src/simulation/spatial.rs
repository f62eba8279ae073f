//! Fixed-radius neighbor index over a snapshot of particle positions.
//!
//! The step loop needs one kind of spatial query: "indices of all particles
//! within radius r of a point". A uniform cell grid answers that in better
//! than O(n) per query for clustered systems: positions are bucketed into
//! cubic cells keyed by integer coordinates, and a query only scans the
//! cells overlapping the query ball.
//!
//! The grid is rebuilt from scratch every force evaluation (positions change
//! every step; there is no incremental update) and is read-only afterwards.

use std::collections::HashMap;

use crate::simulation::states::NVec3;

/// Cell grid over a position snapshot.
///
/// Holds its own copy of the positions so queries stay consistent even while
/// the caller goes on to mutate the live particle set.
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
    positions: Vec<NVec3>,
}

impl SpatialGrid {
    /// Build a grid with the given cell edge length.
    ///
    /// `cell_size` should match the dominant query radius so most queries
    /// touch at most 27 cells. Zero or one position is fine: the grid is
    /// simply empty or holds a single bucket.
    pub fn build(positions: &[NVec3], cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0 && cell_size.is_finite());

        let mut cells: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        for (i, p) in positions.iter().enumerate() {
            cells.entry(cell_key(p, cell_size)).or_default().push(i);
        }

        Self {
            cell_size,
            cells,
            positions: positions.to_vec(),
        }
    }

    /// Indices of all snapshot positions within `radius` of `point`,
    /// the point's own index included when it lies inside the ball.
    pub fn within_radius(&self, point: &NVec3, radius: f64) -> Vec<usize> {
        let mut hits = Vec::new();
        if radius <= 0.0 || self.positions.is_empty() {
            return hits;
        }

        let r_sq = radius * radius;
        let lo = cell_key(&NVec3::new(point.x - radius, point.y - radius, point.z - radius), self.cell_size);
        let hi = cell_key(&NVec3::new(point.x + radius, point.y + radius, point.z + radius), self.cell_size);

        // Scan every cell overlapping the query ball, then filter by the
        // exact squared distance.
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                for cz in lo.2..=hi.2 {
                    let Some(bucket) = self.cells.get(&(cx, cy, cz)) else {
                        continue;
                    };
                    for &i in bucket {
                        let d = self.positions[i] - point;
                        if d.norm_squared() <= r_sq {
                            hits.push(i);
                        }
                    }
                }
            }
        }

        hits
    }

    /// Position stored for snapshot index `i`.
    pub fn position(&self, i: usize) -> &NVec3 {
        &self.positions[i]
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Integer cell coordinates for a point at the given cell edge length.
fn cell_key(p: &NVec3, cell_size: f64) -> (i64, i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    )
}
