use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use snake_survival_core::{AudioCue, Event, MatchSnapshot};

/// Counts of audio cues the match would have played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct AudioTally {
    pub(crate) moves: u32,
    pub(crate) turns: u32,
    pub(crate) eats: u32,
    pub(crate) enemy_hits: u32,
    pub(crate) deaths: u32,
}

/// Running totals gathered from world notifications across every match played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Report {
    pub(crate) matches: u32,
    pub(crate) enemies_spawned: u32,
    pub(crate) enemies_defeated: u32,
    pub(crate) food_devoured: u32,
    pub(crate) upgrades: u32,
    pub(crate) audio: AudioTally,
}

impl Report {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.enemies_spawned += 1,
                Event::EnemyDefeated { .. } => self.enemies_defeated += 1,
                Event::FoodDevoured { .. } => self.food_devoured += 1,
                Event::UpgradeApplied { .. } => self.upgrades += 1,
                Event::SnakeDied { .. } | Event::BoardFilled => self.matches += 1,
                _ => {}
            }

            let Some(cue) = event.audio_cue() else {
                continue;
            };
            let counter = match cue {
                AudioCue::Move => &mut self.audio.moves,
                AudioCue::Turn => &mut self.audio.turns,
                AudioCue::Eat => &mut self.audio.eats,
                AudioCue::EnemyHit => &mut self.audio.enemy_hits,
                AudioCue::Death => &mut self.audio.deaths,
            };
            *counter += 1;
        }
    }

    pub(crate) fn write_summary<W: Write>(
        &self,
        snapshot: &MatchSnapshot,
        mut out: W,
    ) -> Result<()> {
        let progression = snapshot.progression;
        writeln!(
            out,
            "state: {:?}{}",
            snapshot.state,
            snapshot
                .game_over_reason
                .map(|reason| format!(" ({reason:?})"))
                .unwrap_or_default()
        )?;
        writeln!(
            out,
            "score: {} | level: {} | length: {} | time: {:.2}s",
            progression.score,
            progression.level,
            snapshot.snake.len(),
            snapshot.elapsed.as_secs_f32()
        )?;
        writeln!(
            out,
            "finished matches: {} | enemies spawned: {} | defeated: {} | food devoured: {} | upgrades: {}",
            self.matches,
            self.enemies_spawned,
            self.enemies_defeated,
            self.food_devoured,
            self.upgrades
        )?;
        writeln!(
            out,
            "audio cues: move {} | turn {} | eat {} | hit {} | death {}",
            self.audio.moves,
            self.audio.turns,
            self.audio.eats,
            self.audio.enemy_hits,
            self.audio.deaths
        )
        .context("failed to write summary")
    }
}
