use std::collections::HashSet;

use clap::ValueEnum;
use snake_survival_core::{CellCoord, Direction, MatchSnapshot, MatchState, UpgradeChoice};

/// Upgrade picked whenever a level-up is offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum UpgradePolicy {
    /// Rotate through every upgrade in menu order.
    Cycle,
    /// Always add another food item.
    ExtraFood,
    /// Always grow the grid.
    LargerGrid,
    /// Always slow the snake down.
    SlowerPace,
}

/// Scripted player that chases food and answers upgrade prompts.
#[derive(Debug)]
pub(crate) struct Autopilot {
    policy: UpgradePolicy,
    upgrades_chosen: usize,
}

impl Autopilot {
    pub(crate) fn new(policy: UpgradePolicy) -> Self {
        Self {
            policy,
            upgrades_chosen: 0,
        }
    }

    pub(crate) fn choose_upgrade(&mut self) -> UpgradeChoice {
        let choice = match self.policy {
            UpgradePolicy::Cycle => {
                UpgradeChoice::ALL[self.upgrades_chosen % UpgradeChoice::ALL.len()]
            }
            UpgradePolicy::ExtraFood => UpgradeChoice::ExtraFood,
            UpgradePolicy::LargerGrid => UpgradeChoice::LargerGrid,
            UpgradePolicy::SlowerPace => UpgradeChoice::SlowerPace,
        };
        self.upgrades_chosen += 1;
        choice
    }

    /// Heading to queue, or `None` to keep going straight or when a turn is already buffered.
    ///
    /// Picks the safe neighbour closest to the nearest food, preferring the
    /// current heading on ties. Enemies are treated as obstacles.
    pub(crate) fn steer(&self, snapshot: &MatchSnapshot) -> Option<Direction> {
        if !matches!(snapshot.state, MatchState::Countdown | MatchState::Running) {
            return None;
        }
        if snapshot.preview_direction != snapshot.direction {
            return None;
        }

        let head = *snapshot.snake.first()?;
        let tail = snapshot.snake.last().copied();
        let blocked: HashSet<CellCoord> = snapshot
            .snake
            .iter()
            .copied()
            .filter(|cell| Some(*cell) != tail)
            .chain(snapshot.enemies.iter().map(|enemy| enemy.cell))
            .collect();
        let goal = snapshot
            .food
            .iter()
            .map(|food| food.cell)
            .min_by_key(|cell| head.manhattan_distance(*cell));

        let in_bounds = |cell: CellCoord| {
            u32::try_from(cell.x()).is_ok_and(|x| x < snapshot.grid_width)
                && u32::try_from(cell.y()).is_ok_and(|y| y < snapshot.grid_height)
        };

        let (best, _) = Direction::ALL
            .into_iter()
            .filter(|direction| !direction.is_opposite(snapshot.direction))
            .map(|direction| (direction, head.step(direction)))
            .filter(|(_, cell)| in_bounds(*cell) && !blocked.contains(cell))
            .min_by_key(|(direction, cell)| {
                (
                    goal.map_or(0, |goal| cell.manhattan_distance(goal)),
                    *direction != snapshot.direction,
                )
            })?;

        (best != snapshot.direction).then_some(best)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use snake_survival_core::{EnemyId, EnemySnapshot, FoodSnapshot, ProgressionSnapshot};

    fn snapshot(snake: Vec<CellCoord>, food: Option<CellCoord>) -> MatchSnapshot {
        MatchSnapshot {
            state: MatchState::Running,
            game_over_reason: None,
            grid_width: 8,
            grid_height: 8,
            snake,
            direction: Direction::Right,
            preview_direction: Direction::Right,
            food: food
                .into_iter()
                .map(|cell| FoodSnapshot { cell, target: None })
                .collect(),
            enemies: Vec::new(),
            engagement: None,
            progression: ProgressionSnapshot {
                level: 1,
                current_xp: 0,
                xp_to_next: 30,
                pending_level_ups: 0,
                score: 0,
            },
            elapsed: Duration::ZERO,
            countdown_remaining: Duration::ZERO,
            move_interval: Duration::from_millis(150),
            max_food_count: 1,
            enemy_spawn_progress: 0.0,
        }
    }

    #[test]
    fn turns_toward_food() {
        let pilot = Autopilot::new(UpgradePolicy::Cycle);
        let snapshot = snapshot(
            vec![CellCoord::new(3, 3), CellCoord::new(2, 3)],
            Some(CellCoord::new(3, 6)),
        );
        assert_eq!(pilot.steer(&snapshot), Some(Direction::Up));
    }

    #[test]
    fn keeps_heading_when_already_on_course() {
        let pilot = Autopilot::new(UpgradePolicy::Cycle);
        let snapshot = snapshot(
            vec![CellCoord::new(3, 3), CellCoord::new(2, 3)],
            Some(CellCoord::new(6, 3)),
        );
        assert_eq!(pilot.steer(&snapshot), None);
    }

    #[test]
    fn avoids_walls_and_enemies() {
        let pilot = Autopilot::new(UpgradePolicy::Cycle);
        let mut snapshot = snapshot(vec![CellCoord::new(7, 3), CellCoord::new(6, 3)], None);
        snapshot.enemies.push(EnemySnapshot {
            id: EnemyId::new(0),
            cell: CellCoord::new(7, 4),
            hit_points: 5,
        });
        assert_eq!(pilot.steer(&snapshot), Some(Direction::Down));
    }

    #[test]
    fn waits_for_a_buffered_turn() {
        let pilot = Autopilot::new(UpgradePolicy::Cycle);
        let mut snapshot = snapshot(
            vec![CellCoord::new(3, 3), CellCoord::new(2, 3)],
            Some(CellCoord::new(3, 6)),
        );
        snapshot.preview_direction = Direction::Up;
        assert_eq!(pilot.steer(&snapshot), None);
    }

    #[test]
    fn cycle_policy_rotates_through_upgrades() {
        let mut pilot = Autopilot::new(UpgradePolicy::Cycle);
        let picks: Vec<UpgradeChoice> = (0..4).map(|_| pilot.choose_upgrade()).collect();
        assert_eq!(
            picks,
            vec![
                UpgradeChoice::ExtraFood,
                UpgradeChoice::LargerGrid,
                UpgradeChoice::SlowerPace,
                UpgradeChoice::ExtraFood,
            ]
        );
    }
}
