#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Survival engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{
    ConfigError, EnemyConfig, FoodConfig, GridConfig, MatchConfig, ProgressionConfig,
    SnakeConfig,
};

/// Number of segments the snake owns when a match begins.
pub const STARTING_SNAKE_LENGTH: usize = 2;

/// A snake whose length drops to this value or below during combat is dead.
pub const MIN_SNAKE_LENGTH: usize = 2;

/// Offsets of the eight cells surrounding a cell, clockwise from north-west.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
];

/// Lifecycle phase of the current match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    /// Short delay before the first tick during which nothing advances.
    Countdown,
    /// The simulation advances every frame.
    Running,
    /// A level-up prompt is open and the simulation is frozen.
    PausedForUpgrade,
    /// Terminal state; only a restart leaves it.
    GameOver,
}

/// Reasons a match can end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverReason {
    /// The head left the grid.
    WallCollision,
    /// The head ran into the snake's own body.
    SelfCollision,
    /// Combat drained the snake to its minimum viable length.
    CombatAttrition,
    /// No free cell was left to place food or an enemy.
    BoardFull,
}

/// Permanent effects offered to the player on every level gained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeChoice {
    /// Raises the number of simultaneously active food cells by one.
    ExtraFood,
    /// Grows the grid by one column and one row.
    LargerGrid,
    /// Lengthens the movement interval by five percent.
    SlowerPace,
}

impl UpgradeChoice {
    /// Every upgrade that can be offered, in presentation order.
    pub const ALL: [UpgradeChoice; 3] = [Self::ExtraFood, Self::LargerGrid, Self::SlowerPace];
}

/// Why an engagement was cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisengageReason {
    /// The player steered the head away from the engaged enemy.
    Redirected,
    /// The engaged enemy ran out of hit points.
    EnemyDefeated,
    /// The engaged enemy no longer exists at the engaged cell.
    EnemyVanished,
    /// The match ended while engaged.
    MatchEnded,
}

/// Discrete sound cues derived from world events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// The snake advanced one cell.
    Move,
    /// The snake changed heading.
    Turn,
    /// The snake ate food.
    Eat,
    /// The engaged enemy took damage.
    EnemyHit,
    /// The snake died.
    Death,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Buffers a directional intent for upcoming movement ticks.
    QueueDirection {
        /// Heading requested by the player.
        direction: Direction,
    },
    /// Resets every piece of match state and returns to the countdown.
    RequestRestart,
    /// Applies the selected upgrade for one pending level-up.
    ChooseUpgrade {
        /// Upgrade picked by the player.
        choice: UpgradeChoice,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a single movement step of the snake.
    StepSnake,
    /// Resolves one damage exchange with the engaged enemy.
    StrikeEngagedEnemy,
    /// Requests that an enemy be added to the grid.
    SpawnEnemy {
        /// Explicit cell to occupy, or `None` for an occupancy-safe random cell.
        cell: Option<CellCoord>,
    },
    /// Places an additional food item at an explicit cell.
    PlaceFood {
        /// Cell that should receive the food.
        cell: CellCoord,
    },
    /// Records a food item's target enemy and optionally moves it one step.
    AttractFood {
        /// Cell currently holding the food.
        from: CellCoord,
        /// Enemy the food is drifting toward, if any.
        target: Option<EnemyId>,
        /// Neighbouring cell the food should move into.
        to: Option<CellCoord>,
    },
    /// Requests that an enemy consume a food item next to it.
    EnemyEatsFood {
        /// Identifier of the feeding enemy.
        enemy: EnemyId,
        /// Cell holding the food to consume.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the running simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the match entered a new lifecycle phase.
    MatchStateChanged {
        /// Phase that became active.
        state: MatchState,
    },
    /// Confirms that all match state was reset.
    MatchRestarted,
    /// Confirms that a directional intent entered the input buffer.
    DirectionQueued {
        /// Heading shown as the head's preview orientation.
        direction: Direction,
    },
    /// Reports that a movement tick applied a new heading.
    SnakeTurned {
        /// Heading that became current.
        direction: Direction,
    },
    /// Confirms that the snake advanced one cell.
    SnakeMoved {
        /// Head cell before the move.
        from: CellCoord,
        /// Head cell after the move.
        to: CellCoord,
        /// Tail cell released by the move, absent when the snake grew.
        vacated: Option<CellCoord>,
    },
    /// Reports that combat removed the snake's tail segment.
    SegmentLost {
        /// Cell the lost segment occupied.
        cell: CellCoord,
    },
    /// Confirms that food appeared on the grid.
    FoodSpawned {
        /// Cell holding the new food.
        cell: CellCoord,
    },
    /// Reports that the snake ate food.
    FoodEaten {
        /// Cell the eaten food occupied.
        cell: CellCoord,
    },
    /// Reports that food drifted toward an enemy.
    FoodMoved {
        /// Cell the food left.
        from: CellCoord,
        /// Cell the food entered.
        to: CellCoord,
    },
    /// Reports that an enemy ate food next to it.
    FoodDevoured {
        /// Identifier of the enemy that fed.
        enemy: EnemyId,
        /// Cell the eaten food occupied.
        cell: CellCoord,
    },
    /// Reports that an explicit food placement was refused.
    FoodPlacementRejected {
        /// Cell named in the placement request.
        cell: CellCoord,
    },
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Cell the enemy occupies.
        cell: CellCoord,
        /// Hit points the enemy starts with.
        hit_points: u32,
    },
    /// Reports that an explicit enemy placement was refused.
    EnemySpawnRejected {
        /// Cell named in the placement request.
        cell: CellCoord,
    },
    /// Announces that the snake locked into melee with an enemy.
    EngagementStarted {
        /// Identifier of the engaged enemy.
        enemy: EnemyId,
        /// Cell the enemy occupies.
        cell: CellCoord,
    },
    /// Announces that the engagement was cleared.
    EngagementEnded {
        /// Identifier of the previously engaged enemy.
        enemy: EnemyId,
        /// Why the engagement ended.
        reason: DisengageReason,
    },
    /// Reports that the engaged enemy took damage.
    EnemyHit {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Hit points left after the damage.
        remaining_hit_points: u32,
    },
    /// Reports that an enemy was destroyed.
    EnemyDefeated {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Cell the enemy occupied.
        cell: CellCoord,
    },
    /// Reports experience gained by the player.
    ExperienceAwarded {
        /// Amount of experience added.
        amount: u32,
    },
    /// Reports that the player reached a new level.
    LevelReached {
        /// Level that was reached.
        level: u32,
    },
    /// Asks the upgrade collaborator to present a choice.
    LevelUpAvailable {
        /// Number of level-ups still waiting for a choice.
        pending: u32,
    },
    /// Confirms that an upgrade took effect.
    UpgradeApplied {
        /// Upgrade that was applied.
        choice: UpgradeChoice,
    },
    /// Announces new grid bounds; presentation should rebuild its layout.
    GridResized {
        /// Number of columns after the resize.
        width: u32,
        /// Number of rows after the resize.
        height: u32,
    },
    /// Reports that the snake died.
    SnakeDied {
        /// Cause of death.
        reason: GameOverReason,
    },
    /// Reports that the grid ran out of free cells.
    BoardFilled,
}

impl Event {
    /// Sound cue the audio collaborator should play for the event, if any.
    #[must_use]
    pub const fn audio_cue(&self) -> Option<AudioCue> {
        match self {
            Self::SnakeMoved { .. } => Some(AudioCue::Move),
            Self::SnakeTurned { .. } => Some(AudioCue::Turn),
            Self::FoodEaten { .. } => Some(AudioCue::Eat),
            Self::EnemyHit { .. } => Some(AudioCue::EnemyHit),
            Self::SnakeDied { .. } => Some(AudioCue::Death),
            _ => None,
        }
    }
}

/// Cardinal headings available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y`.
    Up,
    /// Movement toward decreasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Every heading, in a fixed order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit delta applied to a cell when moving in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Heading pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether `other` would be a 180° reversal of this heading.
    #[must_use]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Converts a raw delta into a heading. Anything but a cardinal unit vector yields `None`.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Self::Up),
            (0, -1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell. Signed so that positions just outside the grid are representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell offset by an arbitrary delta.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Neighbouring cell one step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Computes the Chebyshev distance, `max(|dx|, |dy|)`, between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Iterator over the eight surrounding cells.
    pub fn neighbors(self) -> impl Iterator<Item = CellCoord> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

/// Immutable representation of a single food item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodSnapshot {
    /// Cell holding the food.
    pub cell: CellCoord,
    /// Enemy the food is currently drifting toward.
    pub target: Option<EnemyId>,
}

/// Read-only snapshot describing all active food.
#[derive(Clone, Debug, Default)]
pub struct FoodView {
    snapshots: Vec<FoodSnapshot>,
}

impl FoodView {
    /// Creates a new food view, preserving spawn order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<FoodSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured food snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &FoodSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether food occupies the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.snapshots.iter().any(|food| food.cell == cell)
    }

    /// Number of food items in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no food.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<FoodSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Cell occupied by the enemy.
    pub cell: CellCoord,
    /// Hit points left.
    pub hit_points: u32,
}

/// Read-only snapshot describing all enemies on the grid.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Enemy occupying the provided cell, if any.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|enemy| enemy.cell == cell)
    }

    /// Number of enemies in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Active melee between the snake's head and an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngagementSnapshot {
    /// Identifier of the engaged enemy.
    pub enemy: EnemyId,
    /// Cell the engaged enemy occupies.
    pub cell: CellCoord,
}

/// Level and experience of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    /// Current level, starting at one.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub current_xp: u32,
    /// Experience required to reach the next level.
    pub xp_to_next: u32,
    /// Level-ups still waiting for an upgrade choice.
    pub pending_level_ups: u32,
    /// Food eaten during the match.
    pub score: u32,
}

/// Complete read-only picture of a match for presentation collaborators.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchSnapshot {
    /// Active lifecycle phase.
    pub state: MatchState,
    /// Cause of the last game over, if the match has ended.
    pub game_over_reason: Option<GameOverReason>,
    /// Number of grid columns.
    pub grid_width: u32,
    /// Number of grid rows.
    pub grid_height: u32,
    /// Snake cells ordered head first.
    pub snake: Vec<CellCoord>,
    /// Heading applied on the last movement tick.
    pub direction: Direction,
    /// Heading the head should be drawn facing.
    pub preview_direction: Direction,
    /// Active food items.
    pub food: Vec<FoodSnapshot>,
    /// Active enemies ordered by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Current engagement, if any.
    pub engagement: Option<EngagementSnapshot>,
    /// Level and experience.
    pub progression: ProgressionSnapshot,
    /// Simulated time spent in the running state.
    pub elapsed: Duration,
    /// Time left before the countdown ends.
    pub countdown_remaining: Duration,
    /// Interval between movement ticks.
    pub move_interval: Duration,
    /// Food count the world replenishes toward.
    pub max_food_count: u32,
    /// Fraction of the enemy spawn interval that has elapsed, in `0.0..=1.0`.
    pub enemy_spawn_progress: f32,
}

#[cfg(test)]
mod tests {
    use super::{AudioCue, CellCoord, Direction, EnemyId, EnemySnapshot, EnemyView, Event};

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
    }

    #[test]
    fn every_direction_reverses_to_its_opposite() {
        for direction in Direction::ALL {
            assert!(direction.is_opposite(direction.opposite()));
            assert!(!direction.is_opposite(direction));
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
    }

    #[test]
    fn malformed_deltas_are_not_directions() {
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(2, 0), None);
    }

    #[test]
    fn up_increases_row() {
        assert_eq!(CellCoord::new(8, 8).step(Direction::Up), CellCoord::new(8, 9));
        assert_eq!(CellCoord::new(0, 0).step(Direction::Left), CellCoord::new(-1, 0));
    }

    #[test]
    fn neighbors_surround_cell_once() {
        let center = CellCoord::new(3, 3);
        let neighbors: Vec<_> = center.neighbors().collect();
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors
            .iter()
            .all(|cell| cell.chebyshev_distance(center) == 1));
    }

    #[test]
    fn enemy_view_orders_by_identifier() {
        let view = EnemyView::from_snapshots(vec![
            EnemySnapshot {
                id: EnemyId::new(4),
                cell: CellCoord::new(1, 1),
                hit_points: 2,
            },
            EnemySnapshot {
                id: EnemyId::new(1),
                cell: CellCoord::new(5, 5),
                hit_points: 5,
            },
        ]);

        let ids: Vec<_> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(
            view.at(CellCoord::new(1, 1)).map(|enemy| enemy.id),
            Some(EnemyId::new(4))
        );
    }

    #[test]
    fn audio_cues_cover_gameplay_moments() {
        assert_eq!(
            Event::FoodEaten {
                cell: CellCoord::new(0, 0)
            }
            .audio_cue(),
            Some(AudioCue::Eat)
        );
        assert_eq!(Event::BoardFilled.audio_cue(), None);
    }
}
