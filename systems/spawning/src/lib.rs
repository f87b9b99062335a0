#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use snake_survival_core::{Command, Event, MatchState};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    decay: f32,
    floor: Duration,
}

impl Config {
    /// Creates a new configuration using the provided cadence, decay factor and floor.
    #[must_use]
    pub const fn new(spawn_interval: Duration, decay: f32, floor: Duration) -> Self {
        Self {
            spawn_interval,
            decay,
            floor,
        }
    }
}

/// Pure system that emits a spawn command whenever the spawn timer elapses.
///
/// Each timed spawn shortens the interval multiplicatively until it reaches
/// the floor. Only a match restart restores the initial interval.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    spawn_interval: Duration,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            config,
        }
    }

    /// Consumes events to emit spawn commands.
    ///
    /// Time keeps accruing while the match is not running, but spawns and
    /// decay wait until a call made with the match running again.
    pub fn handle(&mut self, events: &[Event], state: MatchState, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::MatchRestarted => self.reset(),
                Event::TimeAdvanced { dt } if !self.spawn_interval.is_zero() => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if state != MatchState::Running || self.spawn_interval.is_zero() {
            return;
        }

        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            out.push(Command::SpawnEnemy { cell: None });
            self.decay_interval();
        }
    }

    /// Interval until the next spawn once the timer is empty.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Fraction of the current interval that has elapsed, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.spawn_interval.is_zero() {
            return 0.0;
        }
        (self.accumulator.as_secs_f32() / self.spawn_interval.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn decay_interval(&mut self) {
        let decayed = self
            .spawn_interval
            .mul_f32(self.config.decay)
            .max(self.config.floor);
        self.spawn_interval = decayed.min(self.spawn_interval);
    }

    fn reset(&mut self) {
        self.spawn_interval = self.config.spawn_interval;
        self.accumulator = Duration::ZERO;
    }
}
