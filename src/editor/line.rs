//! Integer line rasterization for continuous brush drags

/// Cells on the Bresenham line from `from` to `to`, both ends included.
///
/// Consecutive cells differ by at most one step on each axis, so a fast
/// pointer drag leaves no gaps.
pub fn bresenham_line(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let (x1, y1) = to;

    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut points = Vec::with_capacity((dx.max(dy) + 1) as usize);
    loop {
        points.push((x, y));
        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    points
}
