#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that paces damage exchanges while the snake is engaged.

use std::time::Duration;

use snake_survival_core::{Command, EnemyId, EngagementSnapshot, Event, MatchState};

/// Configuration parameters required to construct the combat system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    strike_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided damage cadence.
    #[must_use]
    pub const fn new(strike_interval: Duration) -> Self {
        Self { strike_interval }
    }
}

/// Combat system that queues strikes against the engaged enemy.
///
/// The damage timer runs only while an engagement is active and restarts
/// whenever the engaged enemy changes, so the first strike always lands one
/// full interval after contact.
#[derive(Debug)]
pub struct Combat {
    strike_interval: Duration,
    accumulator: Duration,
    engaged: Option<EnemyId>,
}

impl Combat {
    /// Creates a new combat system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            strike_interval: config.strike_interval,
            accumulator: Duration::ZERO,
            engaged: None,
        }
    }

    /// Emits [`Command::StrikeEngagedEnemy`] once per elapsed strike interval.
    ///
    /// Strikes that fall due while the match is not running stay banked and
    /// are emitted on the first call after the match resumes.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: MatchState,
        engagement: Option<EngagementSnapshot>,
        out: &mut Vec<Command>,
    ) {
        let engaged = engagement.map(|snapshot| snapshot.enemy);
        if engaged != self.engaged {
            self.engaged = engaged;
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.engaged.is_none() || self.strike_interval.is_zero() {
            return;
        }

        for event in events {
            match event {
                Event::MatchRestarted => self.accumulator = Duration::ZERO,
                Event::TimeAdvanced { dt } => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if state != MatchState::Running {
            return;
        }
        while self.accumulator >= self.strike_interval {
            self.accumulator -= self.strike_interval;
            out.push(Command::StrikeEngagedEnemy);
        }
    }
}
