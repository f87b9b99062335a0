//! Enemy storage keyed by stable identifiers.

use snake_survival_core::{CellCoord, EnemyId, EnemySnapshot};

#[derive(Clone, Copy, Debug)]
struct Enemy {
    id: EnemyId,
    cell: CellCoord,
    hit_points: u32,
}

/// Live enemies in spawn order. Identifiers are never reused within a match.
#[derive(Clone, Debug, Default)]
pub(crate) struct EnemyRoster {
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyRoster {
    /// Adds an enemy at `cell`; the caller guarantees the cell is free.
    pub(crate) fn insert(&mut self, cell: CellCoord, hit_points: u32) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.enemies.push(Enemy {
            id,
            cell,
            hit_points,
        });
        id
    }

    pub(crate) fn id_at(&self, cell: CellCoord) -> Option<EnemyId> {
        self.enemies
            .iter()
            .find(|enemy| enemy.cell == cell)
            .map(|enemy| enemy.id)
    }

    pub(crate) fn occupies(&self, cell: CellCoord) -> bool {
        self.enemies.iter().any(|enemy| enemy.cell == cell)
    }

    pub(crate) fn cell_of(&self, id: EnemyId) -> Option<CellCoord> {
        self.enemies
            .iter()
            .find(|enemy| enemy.id == id)
            .map(|enemy| enemy.cell)
    }

    /// Subtracts hit points, clamped at zero. Returns the remaining hit points.
    pub(crate) fn apply_damage(&mut self, id: EnemyId, amount: u32) -> Option<u32> {
        let enemy = self.enemies.iter_mut().find(|enemy| enemy.id == id)?;
        enemy.hit_points = enemy.hit_points.saturating_sub(amount);
        Some(enemy.hit_points)
    }

    /// Deletes the enemy, returning the cell it occupied.
    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<CellCoord> {
        let index = self.enemies.iter().position(|enemy| enemy.id == id)?;
        Some(self.enemies.remove(index).cell)
    }

    pub(crate) fn clear(&mut self) {
        self.enemies.clear();
        self.next_id = 0;
    }

    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                cell: enemy.cell,
                hit_points: enemy.hit_points,
            })
            .collect()
    }
}
