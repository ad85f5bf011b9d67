//! Metropolis displacement trial.

use ndarray::Array2;

use cps_core::SimRng;

use crate::energy::total_energy;
use crate::neighborhood::VON_NEUMANN;
use crate::Pos;

/// Move the occupant at scratch index `idx` to `new_pos`, updating both the
/// position table and the occupancy grid.
#[inline]
pub fn displace(positions: &mut [Pos], idx: usize, new_pos: Pos, occupancy: &mut Array2<i32>) {
    let old = positions[idx];
    occupancy[(old[0] as usize, old[1] as usize)] = -1;
    occupancy[(new_pos[0] as usize, new_pos[1] as usize)] = idx as i32;
    positions[idx] = new_pos;
}

/// One displacement trial for agent `idx`.
///
/// A von Neumann neighbor is drawn uniformly; moves out of bounds or onto an
/// occupied cell are rejected outright.  Otherwise the move is made
/// tentatively and accepted with the Boltzmann probability
/// `min(1, exp(−(E1 − E0)))`; a rejected move is reverted, leaving the
/// scratch state bit-identical to before the trial.
///
/// `moved[idx]` is set only on acceptance; the caller applies flagged moves
/// to its authoritative layer afterwards.
pub fn displacement_trial(
    idx: usize,
    positions: &mut [Pos],
    affinities: &[f64],
    occupancy: &mut Array2<i32>,
    moved: &mut [bool],
    rng: &mut SimRng,
) {
    let current_pos = positions[idx];
    let current_energy = total_energy(idx, current_pos, affinities, occupancy);

    let offset = VON_NEUMANN[rng.gen_range(0..VON_NEUMANN.len())];
    let target = [current_pos[0] + offset[0], current_pos[1] + offset[1]];

    let (size_x, size_y) = occupancy.dim();
    if target[0] < 0
        || target[1] < 0
        || target[0] as usize >= size_x
        || target[1] as usize >= size_y
    {
        return;
    }
    if occupancy[(target[0] as usize, target[1] as usize)] != -1 {
        return;
    }

    displace(positions, idx, target, occupancy);
    let target_energy = total_energy(idx, target, affinities, occupancy);
    if rng.random::<f64>() < (-(target_energy - current_energy)).exp() {
        moved[idx] = true;
    } else {
        displace(positions, idx, current_pos, occupancy);
    }
}
