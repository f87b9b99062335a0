#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement cadence that turns elapsed match time into snake steps.

use std::time::Duration;

use snake_survival_core::{Command, Event};

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    accumulator: Duration,
}

impl Movement {
    /// Consumes world events and emits one [`Command::StepSnake`] per elapsed `move_interval`.
    ///
    /// The interval is read from the world on every call so that upgrades
    /// slowing the snake take effect on the next step.
    pub fn handle(&mut self, events: &[Event], move_interval: Duration, out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::MatchRestarted => {
                    self.accumulator = Duration::ZERO;
                    accumulated = Duration::ZERO;
                }
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        if accumulated.is_zero() || move_interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= move_interval {
            self.accumulator -= move_interval;
            out.push(Command::StepSnake);
        }
    }

    /// Time accumulated toward the next step.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }
}
