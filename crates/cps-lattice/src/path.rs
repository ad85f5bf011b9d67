//! Bresenham line tracing between lattice cells.

use crate::Pos;

/// Trace the Bresenham path from `from` to `to`, inclusive of both endpoints.
///
/// The path has `max(|dx|, |dy|) + 1` cells; for `from == to` it is the
/// single cell itself.  Division uses the path to push intermediate agents
/// one step toward the target, so cell-to-cell steps are at most one in each
/// axis.
pub fn bresenham(from: Pos, to: Pos) -> Vec<Pos> {
    let [x1, y1] = from;
    let [x2, y2] = to;
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };

    let mut path = Vec::with_capacity((dx.max(dy) + 1) as usize);
    let mut x = x1;
    let mut y = y1;

    if dy < dx {
        let mut error = dx / 2;
        while x != x2 {
            path.push([x, y]);
            error -= dy;
            if error < 0 {
                y += sy;
                error += dx;
            }
            x += sx;
        }
    } else {
        let mut error = dy / 2;
        while y != y2 {
            path.push([x, y]);
            error -= dx;
            if error < 0 {
                x += sx;
                error += dy;
            }
            y += sy;
        }
    }
    path.push([x2, y2]);
    path
}
