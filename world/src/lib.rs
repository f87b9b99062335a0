#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake Survival.

mod enemies;
mod food;
mod grid;
mod input;
mod placement;
mod progression;
mod snake;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_survival_core::{
    CellCoord, Command, ConfigError, Direction, DisengageReason, EnemyId, Event, GameOverReason,
    MatchConfig, MatchState, UpgradeChoice, MIN_SNAKE_LENGTH,
};
use tracing::{debug, info, trace};

use crate::{
    enemies::EnemyRoster, food::FoodSupply, placement::find_free_cell, progression::Progression,
};

pub use grid::Grid;
pub use input::InputBuffer;
pub use snake::Snake;

/// Factor applied to the movement interval by the slower-pace upgrade.
pub const SLOWER_PACE_FACTOR: f32 = 1.05;

/// Damage dealt to the engaged enemy by each strike.
const STRIKE_DAMAGE: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Engagement {
    enemy: EnemyId,
    cell: CellCoord,
}

/// Represents the authoritative Snake Survival match state.
#[derive(Debug)]
pub struct World {
    config: MatchConfig,
    state: MatchState,
    grid: Grid,
    snake: Snake,
    input: InputBuffer,
    food: FoodSupply,
    enemies: EnemyRoster,
    engagement: Option<Engagement>,
    progression: Progression,
    countdown_remaining: Duration,
    elapsed: Duration,
    move_interval: Duration,
    game_over_reason: Option<GameOverReason>,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world in the countdown state with food already placed.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::new(config.grid.width, config.grid.height);
        let snake = Snake::spawn(&grid);
        let mut world = Self {
            state: MatchState::Countdown,
            input: InputBuffer::new(config.snake.input_buffer_capacity, snake.direction()),
            food: FoodSupply::new(config.food.max_food_count),
            enemies: EnemyRoster::default(),
            engagement: None,
            progression: Progression::new(config.progression),
            countdown_remaining: config.countdown(),
            elapsed: Duration::ZERO,
            move_interval: config.move_interval(),
            game_over_reason: None,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            grid,
            snake,
            config,
        };

        let _ = world.replenish_food(&mut Vec::new());
        Ok(world)
    }

    fn reset_match(&mut self) {
        self.grid = Grid::new(self.config.grid.width, self.config.grid.height);
        self.snake = Snake::spawn(&self.grid);
        self.input = InputBuffer::new(
            self.config.snake.input_buffer_capacity,
            self.snake.direction(),
        );
        self.food.reset(self.config.food.max_food_count);
        self.enemies.clear();
        self.engagement = None;
        self.progression.reset();
        self.countdown_remaining = self.config.countdown();
        self.elapsed = Duration::ZERO;
        self.move_interval = self.config.move_interval();
        self.game_over_reason = None;
    }

    fn set_state(&mut self, state: MatchState, out_events: &mut Vec<Event>) {
        if self.state != state {
            self.state = state;
            out_events.push(Event::MatchStateChanged { state });
        }
    }

    fn is_cell_free(&self, cell: CellCoord) -> bool {
        self.grid.contains(cell) && !occupied(&self.snake, &self.food, &self.enemies, cell)
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        match self.state {
            MatchState::Countdown => {
                self.countdown_remaining = self.countdown_remaining.saturating_sub(dt);
                if self.countdown_remaining.is_zero() {
                    self.set_state(MatchState::Running, out_events);
                }
            }
            MatchState::Running => {
                self.elapsed = self.elapsed.saturating_add(dt);
                out_events.push(Event::TimeAdvanced { dt });
            }
            MatchState::PausedForUpgrade | MatchState::GameOver => {}
        }
    }

    fn queue_direction(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !matches!(self.state, MatchState::Countdown | MatchState::Running) {
            return;
        }
        if self.input.queue(direction, self.snake.direction()) {
            out_events.push(Event::DirectionQueued { direction });
        } else {
            trace!(?direction, "direction intent ignored");
        }
    }

    fn step_snake(&mut self, out_events: &mut Vec<Event>) {
        if self.state != MatchState::Running {
            return;
        }
        self.validate_engagement(out_events);

        let current = self.snake.direction();
        if let Some(direction) = self.input.dequeue_for_tick(current) {
            if direction != current {
                self.snake.set_direction(direction);
                out_events.push(Event::SnakeTurned { direction });
            }
        }

        let Some(head) = self.snake.head() else {
            return;
        };
        let next = head.step(self.snake.direction());

        if let Some(engagement) = self.engagement {
            if engagement.cell == next {
                return;
            }
            self.disengage(DisengageReason::Redirected, out_events);
        }

        if !self.grid.contains(next) {
            self.end_match(GameOverReason::WallCollision, out_events);
            return;
        }

        let will_grow = self.food.contains(next);
        if self.snake.would_collide_with_self(next, will_grow) {
            self.end_match(GameOverReason::SelfCollision, out_events);
            return;
        }

        if let Some(enemy) = self.enemies.id_at(next) {
            self.engagement = Some(Engagement { enemy, cell: next });
            out_events.push(Event::EngagementStarted { enemy, cell: next });
            return;
        }

        let vacated = self.snake.commit_move(next, will_grow);
        out_events.push(Event::SnakeMoved {
            from: head,
            to: next,
            vacated,
        });

        if will_grow {
            self.eat_food(next, out_events);
        }
    }

    fn eat_food(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let _ = self.food.consume(cell);
        out_events.push(Event::FoodEaten { cell });
        self.progression.record_food();

        let amount = self.config.food.xp_per_food;
        out_events.push(Event::ExperienceAwarded { amount });
        let previous_level = self.progression.level();
        let gained = self.progression.award_xp(amount);
        for step in 1..=gained {
            let level = previous_level.saturating_add(step);
            debug!(level, "level reached");
            out_events.push(Event::LevelReached { level });
        }

        if self.replenish_food(out_events) {
            self.try_present_upgrade(out_events);
        }
    }

    fn try_present_upgrade(&mut self, out_events: &mut Vec<Event>) {
        let pending = self.progression.pending_level_ups();
        if self.state != MatchState::Running || pending == 0 {
            return;
        }
        self.set_state(MatchState::PausedForUpgrade, out_events);
        out_events.push(Event::LevelUpAvailable { pending });
    }

    fn strike_engaged_enemy(&mut self, out_events: &mut Vec<Event>) {
        if self.state != MatchState::Running {
            return;
        }
        self.validate_engagement(out_events);
        let Some(engagement) = self.engagement else {
            return;
        };

        if let Some(cell) = self.snake.remove_tail() {
            out_events.push(Event::SegmentLost { cell });
        }
        if self.snake.len() <= MIN_SNAKE_LENGTH {
            self.end_match(GameOverReason::CombatAttrition, out_events);
            return;
        }

        let Some(remaining_hit_points) = self.enemies.apply_damage(engagement.enemy, STRIKE_DAMAGE)
        else {
            return;
        };
        out_events.push(Event::EnemyHit {
            enemy: engagement.enemy,
            remaining_hit_points,
        });
        if remaining_hit_points == 0 {
            self.remove_enemy(engagement.enemy, out_events);
        }
    }

    fn remove_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(cell) = self.enemies.remove(enemy) else {
            return;
        };
        out_events.push(Event::EnemyDefeated { enemy, cell });
        self.food.clear_target_for(enemy);
        if self.engagement.map(|engagement| engagement.enemy) == Some(enemy) {
            self.disengage(DisengageReason::EnemyDefeated, out_events);
        }
    }

    /// Clears an engagement whose enemy no longer stands on the engaged cell.
    fn validate_engagement(&mut self, out_events: &mut Vec<Event>) {
        let Some(engagement) = self.engagement else {
            return;
        };
        if self.enemies.cell_of(engagement.enemy) != Some(engagement.cell) {
            self.disengage(DisengageReason::EnemyVanished, out_events);
        }
    }

    fn disengage(&mut self, reason: DisengageReason, out_events: &mut Vec<Event>) {
        if let Some(engagement) = self.engagement.take() {
            out_events.push(Event::EngagementEnded {
                enemy: engagement.enemy,
                reason,
            });
        }
    }

    fn spawn_enemy(&mut self, cell: Option<CellCoord>, out_events: &mut Vec<Event>) {
        match cell {
            None => {
                if self.state != MatchState::Running {
                    return;
                }
                let found = find_free_cell(&mut self.rng, &self.grid, |cell| {
                    occupied(&self.snake, &self.food, &self.enemies, cell)
                });
                match found {
                    Some(cell) => self.insert_enemy(cell, out_events),
                    None => self.end_match(GameOverReason::BoardFull, out_events),
                }
            }
            Some(cell) => {
                let accepting = matches!(self.state, MatchState::Countdown | MatchState::Running);
                if !accepting || !self.is_cell_free(cell) {
                    trace!(?cell, "enemy placement rejected");
                    out_events.push(Event::EnemySpawnRejected { cell });
                    return;
                }
                self.insert_enemy(cell, out_events);
            }
        }
    }

    fn insert_enemy(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let hit_points = self.config.enemies.hit_points;
        let enemy = self.enemies.insert(cell, hit_points);
        out_events.push(Event::EnemySpawned {
            enemy,
            cell,
            hit_points,
        });
    }

    fn place_food(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let accepting = matches!(self.state, MatchState::Countdown | MatchState::Running);
        if !accepting || !self.is_cell_free(cell) {
            trace!(?cell, "food placement rejected");
            out_events.push(Event::FoodPlacementRejected { cell });
            return;
        }
        self.food.insert(cell);
        out_events.push(Event::FoodSpawned { cell });
    }

    /// Tops food up to the configured count. Ends the match when the board is full.
    fn replenish_food(&mut self, out_events: &mut Vec<Event>) -> bool {
        while self.food.needs_more() {
            let found = find_free_cell(&mut self.rng, &self.grid, |cell| {
                occupied(&self.snake, &self.food, &self.enemies, cell)
            });
            let Some(cell) = found else {
                self.end_match(GameOverReason::BoardFull, out_events);
                return false;
            };
            self.food.insert(cell);
            out_events.push(Event::FoodSpawned { cell });
        }
        true
    }

    fn attract_food(
        &mut self,
        from: CellCoord,
        target: Option<EnemyId>,
        to: Option<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        if self.state != MatchState::Running || !self.food.contains(from) {
            return;
        }
        if target.is_some_and(|enemy| self.enemies.cell_of(enemy).is_none()) {
            trace!(?from, ?target, "attraction toward missing enemy ignored");
            return;
        }
        let _ = self.food.set_target(from, target);

        let Some(to) = to else {
            return;
        };
        if from.chebyshev_distance(to) != 1 || !self.is_cell_free(to) {
            trace!(?from, ?to, "food move rejected");
            return;
        }
        let _ = self.food.relocate(from, to);
        out_events.push(Event::FoodMoved { from, to });
    }

    fn enemy_eats_food(&mut self, enemy: EnemyId, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.state != MatchState::Running {
            return;
        }
        let Some(enemy_cell) = self.enemies.cell_of(enemy) else {
            return;
        };
        if enemy_cell.chebyshev_distance(cell) != 1 || !self.food.consume(cell) {
            trace!(?enemy, ?cell, "enemy feeding rejected");
            return;
        }
        out_events.push(Event::FoodDevoured { enemy, cell });
        let _ = self.replenish_food(out_events);
    }

    fn choose_upgrade(&mut self, choice: UpgradeChoice, out_events: &mut Vec<Event>) {
        if self.state != MatchState::PausedForUpgrade {
            return;
        }

        match choice {
            UpgradeChoice::ExtraFood => self.food.increase_max(),
            UpgradeChoice::LargerGrid => {
                self.grid.grow(1, 1);
                out_events.push(Event::GridResized {
                    width: self.grid.width(),
                    height: self.grid.height(),
                });
            }
            UpgradeChoice::SlowerPace => {
                self.move_interval = self.move_interval.mul_f32(SLOWER_PACE_FACTOR);
            }
        }
        let _ = self.progression.take_pending();
        out_events.push(Event::UpgradeApplied { choice });
        debug!(?choice, "upgrade applied");

        if choice == UpgradeChoice::ExtraFood && !self.replenish_food(out_events) {
            return;
        }

        let pending = self.progression.pending_level_ups();
        if pending > 0 {
            out_events.push(Event::LevelUpAvailable { pending });
        } else {
            self.set_state(MatchState::Running, out_events);
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        let previous = self.grid;
        self.reset_match();
        out_events.push(Event::MatchRestarted);
        if previous != self.grid {
            out_events.push(Event::GridResized {
                width: self.grid.width(),
                height: self.grid.height(),
            });
        }
        self.set_state(MatchState::Countdown, out_events);
        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            "match restarted"
        );
        let _ = self.replenish_food(out_events);
    }

    fn end_match(&mut self, reason: GameOverReason, out_events: &mut Vec<Event>) {
        self.disengage(DisengageReason::MatchEnded, out_events);
        self.input.clear(self.snake.direction());
        self.game_over_reason = Some(reason);
        if reason == GameOverReason::BoardFull {
            out_events.push(Event::BoardFilled);
        } else {
            out_events.push(Event::SnakeDied { reason });
        }
        self.set_state(MatchState::GameOver, out_events);
        debug!(
            ?reason,
            score = self.progression.score(),
            level = self.progression.level(),
            length = self.snake.len(),
            "match ended"
        );
    }
}

fn occupied(snake: &Snake, food: &FoodSupply, enemies: &EnemyRoster, cell: CellCoord) -> bool {
    snake.contains(cell) || food.contains(cell) || enemies.occupies(cell)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::QueueDirection { direction } => world.queue_direction(direction, out_events),
        Command::RequestRestart => world.restart(out_events),
        Command::ChooseUpgrade { choice } => world.choose_upgrade(choice, out_events),
        Command::StepSnake => world.step_snake(out_events),
        Command::StrikeEngagedEnemy => world.strike_engaged_enemy(out_events),
        Command::SpawnEnemy { cell } => world.spawn_enemy(cell, out_events),
        Command::PlaceFood { cell } => world.place_food(cell, out_events),
        Command::AttractFood { from, target, to } => {
            world.attract_food(from, target, to, out_events)
        }
        Command::EnemyEatsFood { enemy, cell } => world.enemy_eats_food(enemy, cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Grid, InputBuffer, Snake, World};
    use snake_survival_core::{
        CellCoord, EngagementSnapshot, EnemyView, FoodView, GameOverReason, MatchConfig,
        MatchSnapshot, MatchState, ProgressionSnapshot,
    };

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &MatchConfig {
        &world.config
    }

    /// Active lifecycle phase.
    #[must_use]
    pub fn match_state(world: &World) -> MatchState {
        world.state
    }

    /// Provides read-only access to the current grid bounds.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the snake.
    #[must_use]
    pub fn snake(world: &World) -> &Snake {
        &world.snake
    }

    /// Provides read-only access to the buffered direction intents.
    #[must_use]
    pub fn input_buffer(world: &World) -> &InputBuffer {
        &world.input
    }

    /// Interval between movement ticks, including upgrade effects.
    #[must_use]
    pub fn move_interval(world: &World) -> Duration {
        world.move_interval
    }

    /// Simulated time spent in the running state.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Time left before the countdown ends.
    #[must_use]
    pub fn countdown_remaining(world: &World) -> Duration {
        world.countdown_remaining
    }

    /// Current engagement, if any.
    #[must_use]
    pub fn engagement(world: &World) -> Option<EngagementSnapshot> {
        world.engagement.map(|engagement| EngagementSnapshot {
            enemy: engagement.enemy,
            cell: engagement.cell,
        })
    }

    /// Cause of the last game over.
    #[must_use]
    pub fn game_over_reason(world: &World) -> Option<GameOverReason> {
        world.game_over_reason
    }

    /// Captures a read-only view of the active food in spawn order.
    #[must_use]
    pub fn food_view(world: &World) -> FoodView {
        FoodView::from_snapshots(world.food.snapshots())
    }

    /// Captures a read-only view of the enemies ordered by identifier.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Reports whether the cell is in bounds and free of snake, food and enemies.
    #[must_use]
    pub fn is_cell_free(world: &World, cell: CellCoord) -> bool {
        world.is_cell_free(cell)
    }

    /// Level, experience and score.
    #[must_use]
    pub fn progression(world: &World) -> ProgressionSnapshot {
        world.progression.snapshot()
    }

    /// Food count the world replenishes toward.
    #[must_use]
    pub fn max_food_count(world: &World) -> u32 {
        world.food.max_count()
    }

    /// Captures the complete presentation snapshot. Spawn progress is owned by the
    /// spawning system and reported as zero here.
    #[must_use]
    pub fn snapshot(world: &World) -> MatchSnapshot {
        MatchSnapshot {
            state: world.state,
            game_over_reason: world.game_over_reason,
            grid_width: world.grid.width(),
            grid_height: world.grid.height(),
            snake: world.snake.cells().collect(),
            direction: world.snake.direction(),
            preview_direction: world.input.preview(),
            food: world.food.snapshots(),
            enemies: enemy_view(world).into_vec(),
            engagement: engagement(world),
            progression: progression(world),
            elapsed: world.elapsed,
            countdown_remaining: world.countdown_remaining,
            move_interval: world.move_interval,
            max_food_count: world.food.max_count(),
            enemy_spawn_progress: 0.0,
        }
    }
}
