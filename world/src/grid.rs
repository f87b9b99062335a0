//! Bounds of the play field.

use snake_survival_core::CellCoord;

/// Discrete rectangular play field. Cells satisfy `0 <= x < width` and `0 <= y < height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Creates a new grid with the provided dimensions.
    #[must_use]
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let within = |value: i32, bound: u32| u32::try_from(value).map_or(false, |v| v < bound);
        within(cell.x(), self.width) && within(cell.y(), self.height)
    }

    /// Number of cells contained in the grid.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Cell at `(width / 2, height / 2)`.
    #[must_use]
    pub fn center(&self) -> CellCoord {
        CellCoord::new(clamp_to_i32(self.width / 2), clamp_to_i32(self.height / 2))
    }

    /// Enumerates every cell in row-major order, bottom row first.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = clamp_to_i32(self.width);
        let height = clamp_to_i32(self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| CellCoord::new(x, y)))
    }

    /// Extends the bounds. Existing cells stay valid because the grid never shrinks.
    pub(crate) fn grow(&mut self, columns: u32, rows: u32) {
        self.width = self.width.saturating_add(columns);
        self.height = self.height.saturating_add(rows);
    }
}

pub(crate) fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
