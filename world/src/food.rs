//! Active food items and their attraction targets.

use snake_survival_core::{CellCoord, EnemyId, FoodSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FoodItem {
    cell: CellCoord,
    target: Option<EnemyId>,
}

/// Food cells in spawn order together with the count the world replenishes toward.
#[derive(Clone, Debug)]
pub(crate) struct FoodSupply {
    items: Vec<FoodItem>,
    max_count: u32,
}

impl FoodSupply {
    pub(crate) fn new(max_count: u32) -> Self {
        Self {
            items: Vec::new(),
            max_count,
        }
    }

    pub(crate) fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Reports whether fewer items exist than the replenishment target.
    pub(crate) fn needs_more(&self) -> bool {
        u32::try_from(self.items.len()).map_or(false, |len| len < self.max_count)
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.items.iter().any(|item| item.cell == cell)
    }

    pub(crate) fn insert(&mut self, cell: CellCoord) {
        self.items.push(FoodItem { cell, target: None });
    }

    /// Removes the food at `cell`, returning whether one existed.
    pub(crate) fn consume(&mut self, cell: CellCoord) -> bool {
        match self.items.iter().position(|item| item.cell == cell) {
            Some(index) => {
                let _ = self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_target(&mut self, cell: CellCoord, target: Option<EnemyId>) -> bool {
        match self.items.iter_mut().find(|item| item.cell == cell) {
            Some(item) => {
                item.target = target;
                true
            }
            None => false,
        }
    }

    pub(crate) fn relocate(&mut self, from: CellCoord, to: CellCoord) -> bool {
        match self.items.iter_mut().find(|item| item.cell == from) {
            Some(item) => {
                item.cell = to;
                true
            }
            None => false,
        }
    }

    /// Forgets every attraction toward `enemy`.
    pub(crate) fn clear_target_for(&mut self, enemy: EnemyId) {
        for item in self.items.iter_mut().filter(|item| item.target == Some(enemy)) {
            item.target = None;
        }
    }

    pub(crate) fn increase_max(&mut self) {
        self.max_count = self.max_count.saturating_add(1);
    }

    pub(crate) fn reset(&mut self, max_count: u32) {
        self.items.clear();
        self.max_count = max_count;
    }

    pub(crate) fn snapshots(&self) -> Vec<FoodSnapshot> {
        self.items
            .iter()
            .map(|item| FoodSnapshot {
                cell: item.cell,
                target: item.target,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replenishment_target_tracks_max_count() {
        let mut food = FoodSupply::new(1);
        assert!(food.needs_more());
        food.insert(CellCoord::new(1, 1));
        assert!(!food.needs_more());
        food.increase_max();
        assert!(food.needs_more());
    }

    #[test]
    fn consuming_removes_only_matching_cell() {
        let mut food = FoodSupply::new(2);
        food.insert(CellCoord::new(1, 1));
        food.insert(CellCoord::new(2, 2));
        assert!(!food.consume(CellCoord::new(3, 3)));
        assert!(food.consume(CellCoord::new(1, 1)));
        assert!(!food.contains(CellCoord::new(1, 1)));
        assert!(food.contains(CellCoord::new(2, 2)));
    }

    #[test]
    fn clearing_targets_spares_other_enemies() {
        let mut food = FoodSupply::new(2);
        food.insert(CellCoord::new(1, 1));
        food.insert(CellCoord::new(4, 4));
        assert!(food.set_target(CellCoord::new(1, 1), Some(EnemyId::new(0))));
        assert!(food.set_target(CellCoord::new(4, 4), Some(EnemyId::new(1))));

        food.clear_target_for(EnemyId::new(0));

        let targets: Vec<_> = food.snapshots().iter().map(|item| item.target).collect();
        assert_eq!(targets, vec![None, Some(EnemyId::new(1))]);
    }

    #[test]
    fn relocation_keeps_target() {
        let mut food = FoodSupply::new(1);
        food.insert(CellCoord::new(1, 1));
        assert!(food.set_target(CellCoord::new(1, 1), Some(EnemyId::new(3))));
        assert!(food.relocate(CellCoord::new(1, 1), CellCoord::new(2, 2)));
        assert_eq!(
            food.snapshots(),
            vec![FoodSnapshot {
                cell: CellCoord::new(2, 2),
                target: Some(EnemyId::new(3)),
            }]
        );
    }
}
