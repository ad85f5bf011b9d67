//! Pairwise binding energetics.
//!
//! The interaction model is a single-site simplification of the Cellular
//! Potts Model: each cell occupies one lattice site, and adhesion between two
//! edge-adjacent cells contributes `−√(β_i·β_j)` where `β` is the binding
//! affinity.  Diagonal neighbors (Manhattan distance 2) contribute nothing;
//! two agents on the same site is an infinite-energy overlap.

use ndarray::Array2;

use crate::neighborhood::MOORE;
use crate::Pos;

/// Interaction energy between two agents at `a` and `b`.
#[inline]
pub fn pairwise_energy(a: Pos, affinity_a: f64, b: Pos, affinity_b: f64) -> f64 {
    let distance = (a[0] - b[0]).abs() + (a[1] - b[1]).abs();
    match distance {
        0 => f64::INFINITY,
        1 => -(affinity_a * affinity_b).sqrt(),
        _ => 0.0,
    }
}

/// Total interaction energy of agent `idx` at `pos`: the sum of pairwise
/// energies against every occupant of the Moore neighborhood.
///
/// `occupancy` maps each cell to the scratch index of its occupant, `-1` for
/// empty.  Out-of-bounds neighbors contribute nothing.
pub fn total_energy(idx: usize, pos: Pos, affinities: &[f64], occupancy: &Array2<i32>) -> f64 {
    let (size_x, size_y) = occupancy.dim();
    let affinity = affinities[idx];
    let mut energy = 0.0;
    for offset in MOORE {
        let nx = pos[0] + offset[0];
        let ny = pos[1] + offset[1];
        if nx < 0 || ny < 0 || nx as usize >= size_x || ny as usize >= size_y {
            continue;
        }
        let neighbor = occupancy[(nx as usize, ny as usize)];
        if neighbor != -1 {
            energy += pairwise_energy(pos, affinity, [nx, ny], affinities[neighbor as usize]);
        }
    }
    energy
}
