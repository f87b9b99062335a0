//! Occupancy-safe cell selection shared by food and enemy spawning.

use rand::Rng;
use snake_survival_core::CellCoord;

use crate::grid::{clamp_to_i32, Grid};

/// Number of uniformly random probes attempted before falling back to a scan.
pub(crate) const RANDOM_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Picks a free cell uniformly at random, falling back to the first free cell in row-major order.
///
/// Returns `None` only when every cell is blocked.
pub(crate) fn find_free_cell<R, F>(rng: &mut R, grid: &Grid, mut is_blocked: F) -> Option<CellCoord>
where
    R: Rng + ?Sized,
    F: FnMut(CellCoord) -> bool,
{
    if grid.area() == 0 {
        return None;
    }

    let width = clamp_to_i32(grid.width());
    let height = clamp_to_i32(grid.height());
    for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
        let cell = CellCoord::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if !is_blocked(cell) {
            return Some(cell);
        }
    }

    grid.cells().find(|cell| !is_blocked(*cell))
}
