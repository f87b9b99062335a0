//! Snake body storage.

use std::collections::{HashSet, VecDeque};

use snake_survival_core::{CellCoord, Direction, STARTING_SNAKE_LENGTH};

use crate::grid::Grid;

/// Ordered body cells, head first, mirrored by a set for constant-time lookups.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<CellCoord>,
    occupied: HashSet<CellCoord>,
    direction: Direction,
}

impl Snake {
    /// Spawns a two-cell snake centred on the grid, facing right.
    #[must_use]
    pub(crate) fn spawn(grid: &Grid) -> Self {
        let head = grid.center();
        let mut snake = Self {
            body: VecDeque::with_capacity(STARTING_SNAKE_LENGTH),
            occupied: HashSet::with_capacity(STARTING_SNAKE_LENGTH),
            direction: Direction::Right,
        };
        for offset in 0..STARTING_SNAKE_LENGTH {
            let dx = i32::try_from(offset).unwrap_or(i32::MAX);
            let cell = head.offset(-dx, 0);
            snake.body.push_back(cell);
            let _ = snake.occupied.insert(cell);
        }
        snake
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.body.front().copied()
    }

    /// Cell occupied by the last segment.
    #[must_use]
    pub fn tail(&self) -> Option<CellCoord> {
        self.body.back().copied()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Reports whether the snake has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Reports whether a segment occupies the cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.occupied.contains(&cell)
    }

    /// Body cells, head first.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.body.iter().copied()
    }

    /// Heading applied on the last movement tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Reports whether moving the head into `next` would hit the body.
    ///
    /// The tail cell is free when the snake is not growing because the tail
    /// vacates it during the same tick.
    #[must_use]
    pub fn would_collide_with_self(&self, next: CellCoord, will_grow: bool) -> bool {
        if !self.contains(next) {
            return false;
        }
        will_grow || self.tail() != Some(next)
    }

    /// Prepends `next` as the new head and trims the tail unless growing.
    ///
    /// Returns the vacated tail cell.
    pub(crate) fn commit_move(&mut self, next: CellCoord, will_grow: bool) -> Option<CellCoord> {
        let vacated = if will_grow {
            None
        } else {
            let tail = self.body.pop_back();
            if let Some(cell) = tail {
                let _ = self.occupied.remove(&cell);
            }
            tail
        };
        self.body.push_front(next);
        let _ = self.occupied.insert(next);
        vacated
    }

    /// Removes the last segment, never removing the head.
    pub(crate) fn remove_tail(&mut self) -> Option<CellCoord> {
        if self.body.len() <= 1 {
            return None;
        }
        let tail = self.body.pop_back()?;
        let _ = self.occupied.remove(&tail);
        Some(tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_from(cells: &[(i32, i32)]) -> Snake {
        let body: VecDeque<CellCoord> = cells.iter().map(|&(x, y)| CellCoord::new(x, y)).collect();
        let occupied = body.iter().copied().collect();
        Snake {
            body,
            occupied,
            direction: Direction::Right,
        }
    }

    #[test]
    fn spawns_centred_facing_right() {
        let snake = Snake::spawn(&Grid::new(16, 16));
        let cells: Vec<_> = snake.cells().collect();
        assert_eq!(cells, vec![CellCoord::new(8, 8), CellCoord::new(7, 8)]);
        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn tail_cell_is_free_only_without_growth() {
        let snake = snake_from(&[(1, 1), (2, 1), (2, 0), (1, 0)]);
        let tail = CellCoord::new(1, 0);
        assert!(!snake.would_collide_with_self(tail, false));
        assert!(snake.would_collide_with_self(tail, true));
        assert!(snake.would_collide_with_self(CellCoord::new(2, 0), false));
        assert!(!snake.would_collide_with_self(CellCoord::new(0, 1), true));
    }

    #[test]
    fn chasing_the_tail_keeps_set_in_sync() {
        let mut snake = snake_from(&[(1, 1), (2, 1), (2, 0), (1, 0)]);
        let vacated = snake.commit_move(CellCoord::new(1, 0), false);
        assert_eq!(vacated, Some(CellCoord::new(1, 0)));
        assert_eq!(snake.len(), 4);
        assert!(snake.contains(CellCoord::new(1, 0)));
        assert_eq!(snake.occupied.len(), snake.body.len());
    }

    #[test]
    fn growing_retains_tail() {
        let mut snake = snake_from(&[(8, 8), (7, 8)]);
        assert_eq!(snake.commit_move(CellCoord::new(9, 8), true), None);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.tail(), Some(CellCoord::new(7, 8)));
    }

    #[test]
    fn removing_tail_never_removes_head() {
        let mut snake = snake_from(&[(8, 8), (7, 8)]);
        assert_eq!(snake.remove_tail(), Some(CellCoord::new(7, 8)));
        assert_eq!(snake.remove_tail(), None);
        assert_eq!(snake.head(), Some(CellCoord::new(8, 8)));
        assert!(!snake.contains(CellCoord::new(7, 8)));
    }
}
