//! Experience, levels and pending upgrade prompts.

use snake_survival_core::{ProgressionConfig, ProgressionSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Progression {
    config: ProgressionConfig,
    level: u32,
    current_xp: u32,
    xp_to_next: u32,
    pending_level_ups: u32,
    score: u32,
}

impl Progression {
    pub(crate) fn new(config: ProgressionConfig) -> Self {
        Self {
            config,
            level: 1,
            current_xp: 0,
            xp_to_next: threshold(config, 1),
            pending_level_ups: 0,
            score: 0,
        }
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn pending_level_ups(&self) -> u32 {
        self.pending_level_ups
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn record_food(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    /// Adds experience and normalises it against the level curve.
    ///
    /// Returns the number of levels gained; each one queues a pending upgrade.
    pub(crate) fn award_xp(&mut self, amount: u32) -> u32 {
        self.current_xp = self.current_xp.saturating_add(amount);
        let mut gained = 0;
        while self.current_xp >= self.xp_to_next {
            self.current_xp -= self.xp_to_next;
            self.level = self.level.saturating_add(1);
            self.pending_level_ups = self.pending_level_ups.saturating_add(1);
            self.xp_to_next = threshold(self.config, self.level);
            gained += 1;
        }
        gained
    }

    /// Consumes one pending level-up, returning whether one was waiting.
    pub(crate) fn take_pending(&mut self) -> bool {
        if self.pending_level_ups == 0 {
            return false;
        }
        self.pending_level_ups -= 1;
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub(crate) fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            level: self.level,
            current_xp: self.current_xp,
            xp_to_next: self.xp_to_next,
            pending_level_ups: self.pending_level_ups,
            score: self.score,
        }
    }
}

fn threshold(config: ProgressionConfig, level: u32) -> u32 {
    config
        .base_xp_to_next
        .saturating_add(level.saturating_sub(1).saturating_mul(config.xp_increment_per_level))
        .max(1)
}
