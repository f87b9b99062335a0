//! Tunable match parameters and their validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every tunable parameter of a match.
///
/// Missing TOML sections and fields fall back to [`Default`], so a config file
/// only needs to name the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for every random decision taken during the match.
    pub seed: u64,
    /// Length of the countdown that precedes each match.
    pub countdown_seconds: f32,
    /// Play field dimensions.
    pub grid: GridConfig,
    /// Snake pacing and input buffering.
    pub snake: SnakeConfig,
    /// Food supply and food/enemy interaction.
    pub food: FoodConfig,
    /// Enemy durability, spawning and combat pacing.
    pub enemies: EnemyConfig,
    /// Experience curve.
    pub progression: ProgressionConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f5a_a4e5_2b17,
            countdown_seconds: 2.0,
            grid: GridConfig::default(),
            snake: SnakeConfig::default(),
            food: FoodConfig::default(),
            enemies: EnemyConfig::default(),
            progression: ProgressionConfig::default(),
        }
    }
}

/// Play field dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
        }
    }
}

/// Snake pacing and input buffering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Seconds between movement ticks.
    pub move_interval_seconds: f32,
    /// Maximum number of buffered directional intents.
    pub input_buffer_capacity: usize,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            move_interval_seconds: 0.15,
            input_buffer_capacity: 4,
        }
    }
}

/// Food supply and food/enemy interaction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Number of food items the world keeps on the grid.
    pub max_food_count: u32,
    /// Experience awarded per food eaten by the snake.
    pub xp_per_food: u32,
    /// Seconds between food attraction passes.
    pub attraction_interval_seconds: f32,
    /// Chebyshev radius within which food notices enemies.
    pub attraction_radius: u32,
    /// Seconds between enemy feeding passes.
    pub eating_interval_seconds: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            max_food_count: 1,
            xp_per_food: 10,
            attraction_interval_seconds: 3.0,
            attraction_radius: 2,
            eating_interval_seconds: 4.0,
        }
    }
}

/// Enemy durability, spawning and combat pacing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Hit points of a freshly spawned enemy.
    pub hit_points: u32,
    /// Seconds between spawns at the start of a match.
    pub spawn_interval_seconds: f32,
    /// Factor applied to the spawn interval after every timed spawn.
    pub spawn_interval_decay: f32,
    /// Shortest spawn interval the decay may reach.
    pub spawn_interval_floor_seconds: f32,
    /// Seconds between damage exchanges while engaged.
    pub damage_interval_seconds: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            hit_points: 5,
            spawn_interval_seconds: 8.0,
            spawn_interval_decay: 0.95,
            spawn_interval_floor_seconds: 2.0,
            damage_interval_seconds: 0.5,
        }
    }
}

/// Experience curve: level `n` requires `base_xp_to_next + (n - 1) * xp_increment_per_level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Experience required to leave level one.
    pub base_xp_to_next: u32,
    /// Additional experience required per level gained.
    pub xp_increment_per_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_xp_to_next: 30,
            xp_increment_per_level: 20,
        }
    }
}

/// Reasons a [`MatchConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid cannot hold the starting snake.
    #[error("grid must be at least 2x1 cells (received {width}x{height})")]
    GridTooSmall {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A duration is negative, non-finite or zero where zero is not allowed.
    #[error("{field} must be a finite positive number of seconds (received {value})")]
    InvalidInterval {
        /// Name of the offending setting.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// The input buffer could never hold an intent.
    #[error("input buffer capacity must be positive")]
    ZeroInputCapacity,
    /// The spawn decay would lengthen the interval or collapse it to zero.
    #[error("spawn interval decay must lie in (0, 1] (received {0})")]
    InvalidSpawnDecay(f32),
    /// Enemies would spawn already dead.
    #[error("enemies must spawn with at least one hit point")]
    ZeroHitPoints,
    /// Every experience award would level up forever.
    #[error("experience required to leave level one must be positive")]
    ZeroExperienceThreshold,
}

impl MatchConfig {
    /// Checks every setting, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < 2 || self.grid.height < 1 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid.width,
                height: self.grid.height,
            });
        }

        check_seconds("countdown_seconds", self.countdown_seconds, true)?;
        check_seconds(
            "snake.move_interval_seconds",
            self.snake.move_interval_seconds,
            false,
        )?;
        check_seconds(
            "food.attraction_interval_seconds",
            self.food.attraction_interval_seconds,
            false,
        )?;
        check_seconds(
            "food.eating_interval_seconds",
            self.food.eating_interval_seconds,
            false,
        )?;
        check_seconds(
            "enemies.spawn_interval_seconds",
            self.enemies.spawn_interval_seconds,
            false,
        )?;
        check_seconds(
            "enemies.spawn_interval_floor_seconds",
            self.enemies.spawn_interval_floor_seconds,
            false,
        )?;
        check_seconds(
            "enemies.damage_interval_seconds",
            self.enemies.damage_interval_seconds,
            false,
        )?;

        if self.snake.input_buffer_capacity == 0 {
            return Err(ConfigError::ZeroInputCapacity);
        }

        let decay = self.enemies.spawn_interval_decay;
        if !decay.is_finite() || decay <= 0.0 || decay > 1.0 {
            return Err(ConfigError::InvalidSpawnDecay(decay));
        }

        if self.enemies.hit_points == 0 {
            return Err(ConfigError::ZeroHitPoints);
        }

        if self.progression.base_xp_to_next == 0 {
            return Err(ConfigError::ZeroExperienceThreshold);
        }

        Ok(())
    }

    /// Length of the pre-match countdown.
    #[must_use]
    pub fn countdown(&self) -> Duration {
        seconds(self.countdown_seconds)
    }

    /// Interval between movement ticks at the start of a match.
    #[must_use]
    pub fn move_interval(&self) -> Duration {
        seconds(self.snake.move_interval_seconds)
    }

    /// Interval between food attraction passes.
    #[must_use]
    pub fn attraction_interval(&self) -> Duration {
        seconds(self.food.attraction_interval_seconds)
    }

    /// Interval between enemy feeding passes.
    #[must_use]
    pub fn eating_interval(&self) -> Duration {
        seconds(self.food.eating_interval_seconds)
    }

    /// Spawn interval at the start of a match.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        seconds(self.enemies.spawn_interval_seconds)
    }

    /// Shortest spawn interval reachable through decay.
    #[must_use]
    pub fn spawn_interval_floor(&self) -> Duration {
        seconds(self.enemies.spawn_interval_floor_seconds)
    }

    /// Interval between damage exchanges while engaged.
    #[must_use]
    pub fn damage_interval(&self) -> Duration {
        seconds(self.enemies.damage_interval_seconds)
    }
}

fn check_seconds(field: &'static str, value: f32, allow_zero: bool) -> Result<(), ConfigError> {
    let valid = value.is_finite()
        && value < 1.0e9
        && if allow_zero { value >= 0.0 } else { value > 0.0 };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidInterval { field, value })
    }
}

/// Resolves a seconds setting to whole microseconds so that decimal values such
/// as `0.15` produce exact durations.
fn seconds(value: f32) -> Duration {
    let micros = (f64::from(value) * 1_000_000.0).round();
    if micros.is_finite() && micros > 0.0 {
        Duration::from_micros(micros as u64)
    } else {
        Duration::ZERO
    }
}
