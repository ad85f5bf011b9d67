//! Neighborhood offset tables.

use crate::Pos;

/// The four edge-adjacent offsets.  Displacement trials draw their move
/// target from this set.
pub const VON_NEUMANN: [Pos; 4] = [[-1, 0], [1, 0], [0, -1], [0, 1]];

/// The eight surrounding offsets.  Interaction energy sums over this set.
pub const MOORE: [Pos; 8] = [
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, -1],
    [0, 1],
    [1, -1],
    [1, 0],
    [1, 1],
];
