#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Food and enemy interaction: enemies feed on adjacent food, and food drifts
//! toward nearby enemies.
//!
//! Both behaviours run on their own coarse cadence, independent of the
//! snake's movement interval. When both cadences elapse in the same frame the
//! feeding pass is resolved first and the food it claims is not attracted.

use std::time::Duration;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_survival_core::{
    CellCoord, Command, EnemySnapshot, EnemyView, Event, FoodSnapshot, FoodView, MatchState,
    NEIGHBOR_OFFSETS,
};

/// Configuration parameters required to construct the foraging system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    attraction_interval: Duration,
    eating_interval: Duration,
    attraction_radius: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from both cadences, the attraction radius and a seed.
    #[must_use]
    pub const fn new(
        attraction_interval: Duration,
        eating_interval: Duration,
        attraction_radius: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            attraction_interval,
            eating_interval,
            attraction_radius,
            rng_seed,
        }
    }
}

/// Pure system that proposes food movements and enemy feeding.
#[derive(Debug)]
pub struct Foraging {
    config: Config,
    attraction_accumulator: Duration,
    eating_accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Foraging {
    /// Creates a new foraging system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            attraction_accumulator: Duration::ZERO,
            eating_accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
        }
    }

    /// Consumes events and immutable views to emit feeding and attraction commands.
    ///
    /// Passes run only on calls carrying elapsed time or the match resuming,
    /// at most one of each behaviour per call. A pass that falls due while
    /// the match is not running is held until it resumes.
    /// `is_cell_free` must report whether a cell is inside the grid and
    /// unoccupied.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        state: MatchState,
        food: &FoodView,
        enemies: &EnemyView,
        is_cell_free: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        let mut woke = false;
        for event in events {
            match event {
                Event::MatchRestarted => {
                    self.attraction_accumulator = Duration::ZERO;
                    self.eating_accumulator = Duration::ZERO;
                }
                Event::MatchStateChanged {
                    state: MatchState::Running,
                } => woke = true,
                Event::TimeAdvanced { dt } => {
                    woke = true;
                    accrue(&mut self.eating_accumulator, *dt, self.config.eating_interval);
                    accrue(
                        &mut self.attraction_accumulator,
                        *dt,
                        self.config.attraction_interval,
                    );
                }
                _ => {}
            }
        }

        if !woke || state != MatchState::Running {
            return;
        }

        let eat = take_due(&mut self.eating_accumulator, self.config.eating_interval);
        let attract = take_due(
            &mut self.attraction_accumulator,
            self.config.attraction_interval,
        );

        let mut eaten = Vec::new();
        if eat {
            self.resolve_eating(food, enemies, &mut eaten, out);
        }
        if attract {
            self.resolve_attraction(food, enemies, &eaten, &is_cell_free, out);
        }
    }

    fn resolve_eating(
        &mut self,
        food: &FoodView,
        enemies: &EnemyView,
        eaten: &mut Vec<CellCoord>,
        out: &mut Vec<Command>,
    ) {
        if food.is_empty() {
            return;
        }

        for enemy in enemies.iter() {
            let mut offsets = NEIGHBOR_OFFSETS;
            offsets.shuffle(&mut self.rng);
            let meal = offsets
                .iter()
                .map(|&(dx, dy)| enemy.cell.offset(dx, dy))
                .find(|cell| food.contains(*cell) && !eaten.contains(cell));
            if let Some(cell) = meal {
                eaten.push(cell);
                out.push(Command::EnemyEatsFood {
                    enemy: enemy.id,
                    cell,
                });
            }
        }
    }

    fn resolve_attraction<F>(
        &mut self,
        food: &FoodView,
        enemies: &EnemyView,
        eaten: &[CellCoord],
        is_cell_free: &F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        let mut reserved: Vec<CellCoord> = Vec::new();
        for item in food.iter().filter(|item| !eaten.contains(&item.cell)) {
            let target = self.select_target(item, enemies);
            let destination = target.and_then(|enemy| {
                step_toward(item.cell, enemy.cell, |cell| {
                    is_cell_free(cell) && !reserved.contains(&cell)
                })
            });
            if let Some(cell) = destination {
                reserved.push(cell);
            }

            let target = target.map(|enemy| enemy.id);
            if target != item.target || destination.is_some() {
                out.push(Command::AttractFood {
                    from: item.cell,
                    target,
                    to: destination,
                });
            }
        }
    }

    /// Nearest enemy within the attraction radius. Ties keep the current
    /// target when it is among them and are otherwise broken uniformly.
    fn select_target<'a>(
        &mut self,
        item: &FoodSnapshot,
        enemies: &'a EnemyView,
    ) -> Option<&'a EnemySnapshot> {
        let radius = self.config.attraction_radius;
        let nearest = enemies
            .iter()
            .map(|enemy| item.cell.chebyshev_distance(enemy.cell))
            .filter(|distance| *distance <= radius)
            .min()?;
        let candidates: Vec<&EnemySnapshot> = enemies
            .iter()
            .filter(|enemy| item.cell.chebyshev_distance(enemy.cell) == nearest)
            .collect();

        if let Some(current) = candidates
            .iter()
            .find(|enemy| Some(enemy.id) == item.target)
        {
            return Some(*current);
        }
        candidates.choose(&mut self.rng).copied()
    }
}

/// Adds `dt` to a cadence timer. Disabled cadences never accrue.
fn accrue(accumulator: &mut Duration, dt: Duration, interval: Duration) {
    if !interval.is_zero() {
        *accumulator = accumulator.saturating_add(dt);
    }
}

/// Whether a pass is due, consuming one interval if so.
fn take_due(accumulator: &mut Duration, interval: Duration) -> bool {
    if interval.is_zero() || *accumulator < interval {
        return false;
    }
    *accumulator -= interval;
    true
}

/// One step from `from` toward `to`, or `None` when already adjacent or boxed in.
///
/// The direct diagonal or orthogonal step is tried first; the remaining
/// neighbours are tried if they strictly reduce the Chebyshev distance,
/// closest first.
fn step_toward<F>(from: CellCoord, to: CellCoord, is_open: F) -> Option<CellCoord>
where
    F: Fn(CellCoord) -> bool,
{
    let distance = from.chebyshev_distance(to);
    if distance <= 1 {
        return None;
    }

    let direct = from.offset((to.x() - from.x()).signum(), (to.y() - from.y()).signum());
    if is_open(direct) {
        return Some(direct);
    }

    let mut alternatives: Vec<CellCoord> = from
        .neighbors()
        .filter(|cell| *cell != direct && cell.chebyshev_distance(to) < distance)
        .collect();
    alternatives.sort_by_key(|cell| (cell.chebyshev_distance(to), cell.manhattan_distance(to)));
    alternatives.into_iter().find(|cell| is_open(*cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_food_stays_put() {
        let from = CellCoord::new(4, 4);
        assert_eq!(step_toward(from, CellCoord::new(5, 5), |_| true), None);
    }

    #[test]
    fn prefers_direct_diagonal_step() {
        let from = CellCoord::new(2, 2);
        let to = CellCoord::new(4, 4);
        assert_eq!(step_toward(from, to, |_| true), Some(CellCoord::new(3, 3)));
    }

    #[test]
    fn detours_around_blocked_direct_step() {
        let from = CellCoord::new(2, 2);
        let to = CellCoord::new(4, 2);
        let blocked = CellCoord::new(3, 2);
        let step = step_toward(from, to, |cell| cell != blocked).expect("detour exists");
        assert_eq!(step.x(), 3);
        assert!(step.chebyshev_distance(to) < from.chebyshev_distance(to));
    }

    #[test]
    fn boxed_in_food_does_not_move() {
        let from = CellCoord::new(2, 2);
        let to = CellCoord::new(4, 4);
        let open = CellCoord::new(1, 1);
        assert_eq!(step_toward(from, to, |cell| cell == open), None);
    }

    #[test]
    fn cadence_fires_once_per_call() {
        let mut accumulator = Duration::ZERO;
        let interval = Duration::from_secs(3);
        accrue(&mut accumulator, Duration::from_secs(2), interval);
        assert!(!take_due(&mut accumulator, interval));
        accrue(&mut accumulator, Duration::from_secs(7), interval);
        assert!(take_due(&mut accumulator, interval));
        assert_eq!(accumulator, Duration::from_secs(6));
        assert!(take_due(&mut accumulator, interval));
    }

    #[test]
    fn disabled_cadence_never_fires() {
        let mut accumulator = Duration::ZERO;
        accrue(&mut accumulator, Duration::from_secs(9), Duration::ZERO);
        assert_eq!(accumulator, Duration::ZERO);
        assert!(!take_due(&mut accumulator, Duration::ZERO));
    }
}
