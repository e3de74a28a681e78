use crate::grid::Grid;

/// Swap diagonal quadrants (top-left with bottom-right, top-right with
/// bottom-left), moving the zero-frequency cell between corner and center.
///
/// Callers crop to even dimensions first; on an even grid the swap is its
/// own inverse.
pub fn center_shift<T: Clone>(grid: &Grid<T>) -> Grid<T> {
    debug_assert!(grid.has_even_dims(), "center_shift expects even dimensions");
    let (w, h) = grid.dims();
    let (cx, cy) = (w / 2, h / 2);
    Grid::from_fn(w, h, |x, y| grid[((x + cx) % w, (y + cy) % h)].clone())
}
