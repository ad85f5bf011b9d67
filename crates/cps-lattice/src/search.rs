//! Nearest-empty-site search for division targets.

use ndarray::Array2;

use crate::Pos;

/// Find the empty cells closest to `origin` by Euclidean distance.
///
/// `occupied[c]` is `true` where a cell already holds an agent.  Returns the
/// minimal distance and every cell attaining it (grouped by exact squared
/// distance, so symmetric candidates are never split by rounding), or `None`
/// if the lattice has no empty cell at all.
///
/// With a single source cell the Euclidean distance transform of the
/// occupancy mask reduces to the direct distance `|c − origin|`, computed
/// here without building the intermediate map.
pub fn nearest_empty_sites(occupied: &Array2<bool>, origin: Pos) -> Option<(f64, Vec<Pos>)> {
    let (size_x, size_y) = occupied.dim();
    let mut best_sq: Option<i64> = None;
    let mut sites: Vec<Pos> = Vec::new();

    for x in 0..size_x {
        for y in 0..size_y {
            if occupied[(x, y)] {
                continue;
            }
            let dx = x as i64 - origin[0] as i64;
            let dy = y as i64 - origin[1] as i64;
            let sq = dx * dx + dy * dy;
            match best_sq {
                Some(b) if sq > b => {}
                Some(b) if sq == b => sites.push([x as i32, y as i32]),
                _ => {
                    best_sq = Some(sq);
                    sites.clear();
                    sites.push([x as i32, y as i32]);
                }
            }
        }
    }

    best_sq.map(|sq| ((sq as f64).sqrt(), sites))
}
