//! Square brush footprint

/// Largest brush side length
pub const MAX_BRUSH_SIZE: usize = 10;

/// In-bounds cells covered by a square brush of side `size` on cell
/// `(cx, cy)`.
///
/// The square starts `(size - 1) / 2` cells up and left of the cursor, so
/// even sizes lean right and down. Cells off the grid are skipped.
pub fn brush_cells(cx: i32, cy: i32, size: usize, width: usize, height: usize) -> Vec<(usize, usize)> {
    let size = size.max(1) as i32;
    let offset = (size - 1) / 2;

    let mut cells = Vec::with_capacity((size * size) as usize);
    for bx in 0..size {
        for by in 0..size {
            let gx = cx - offset + bx;
            let gy = cy - offset + by;
            if gx < 0 || gy < 0 || gx as usize >= width || gy as usize >= height {
                continue;
            }
            cells.push((gx as usize, gy as usize));
        }
    }
    cells
}

/// Top-left cell of the brush square, used for the cursor outline
pub fn brush_origin(cx: i32, cy: i32, size: usize) -> (i32, i32) {
    let offset = (size.max(1) as i32 - 1) / 2;
    (cx - offset, cy - offset)
}
