#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Survival adapters.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result as AnyResult};
use snake_survival_core::{
    CellCoord, Direction, GameOverReason, MatchSnapshot, MatchState, UpgradeChoice,
};
use thiserror::Error;

/// Visual representation of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Unoccupied cell.
    Empty,
    /// Frame drawn around the play field.
    Border,
    /// Snake head oriented along its heading.
    Head(Direction),
    /// Snake segment behind the head.
    Body,
    /// Food item.
    Food,
    /// Enemy that is not engaged.
    Enemy {
        /// Hit points left.
        hit_points: u32,
    },
    /// Enemy currently locked in melee with the snake.
    EngagedEnemy,
}

impl Glyph {
    /// Character used by text backends.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Border => '#',
            Self::Head(Direction::Up) => '^',
            Self::Head(Direction::Down) => 'v',
            Self::Head(Direction::Left) => '<',
            Self::Head(Direction::Right) => '>',
            Self::Body => 'o',
            Self::Food => '*',
            Self::Enemy { hit_points } => match hit_points {
                0..=9 => (b'0' + hit_points as u8) as char,
                _ => '+',
            },
            Self::EngagedEnemy => 'X',
        }
    }
}

/// Heads-up display values derived from a match snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Lifecycle phase of the match.
    pub state: MatchState,
    /// Why the last match ended, if it did.
    pub game_over_reason: Option<GameOverReason>,
    /// Current player level.
    pub level: u32,
    /// Experience collected toward the next level.
    pub current_xp: u32,
    /// Experience required to leave the current level.
    pub xp_to_next: u32,
    /// Level-ups still waiting for an upgrade choice.
    pub pending_upgrades: u32,
    /// Food eaten this match.
    pub score: u32,
    /// Number of snake segments.
    pub length: usize,
    /// Time spent running.
    pub elapsed: Duration,
    /// Time left before the match starts.
    pub countdown_remaining: Duration,
    /// Fraction of the enemy spawn interval already elapsed.
    pub enemy_spawn_progress: f32,
}

impl Hud {
    /// Extracts the HUD values from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Self {
        Self {
            state: snapshot.state,
            game_over_reason: snapshot.game_over_reason,
            level: snapshot.progression.level,
            current_xp: snapshot.progression.current_xp,
            xp_to_next: snapshot.progression.xp_to_next,
            pending_upgrades: snapshot.progression.pending_level_ups,
            score: snapshot.progression.score,
            length: snapshot.snake.len(),
            elapsed: snapshot.elapsed,
            countdown_remaining: snapshot.countdown_remaining,
            enemy_spawn_progress: snapshot.enemy_spawn_progress,
        }
    }

    /// Single-line summary suitable for a status bar.
    #[must_use]
    pub fn status_line(&self) -> String {
        let stats = format!(
            "level {} | xp {}/{} | score {} | length {} | time {:.1}s",
            self.level,
            self.current_xp,
            self.xp_to_next,
            self.score,
            self.length,
            self.elapsed.as_secs_f32(),
        );
        match self.state {
            MatchState::Countdown => format!(
                "starting in {:.1}s | {stats}",
                self.countdown_remaining.as_secs_f32()
            ),
            MatchState::Running => format!(
                "{stats} | next enemy {}%",
                (self.enemy_spawn_progress.clamp(0.0, 1.0) * 100.0).round() as u32
            ),
            MatchState::PausedForUpgrade => format!(
                "level up! choose {} ({} pending) | {stats}",
                upgrade_menu(),
                self.pending_upgrades
            ),
            MatchState::GameOver => format!(
                "game over: {} | {stats}",
                self.game_over_reason
                    .map_or("unknown", describe_game_over)
            ),
        }
    }
}

fn describe_game_over(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::WallCollision => "hit the wall",
        GameOverReason::SelfCollision => "bit its own tail",
        GameOverReason::CombatAttrition => "worn down in combat",
        GameOverReason::BoardFull => "the board is full",
    }
}

fn upgrade_menu() -> String {
    UpgradeChoice::ALL
        .iter()
        .enumerate()
        .map(|(index, choice)| {
            let label = match choice {
                UpgradeChoice::ExtraFood => "extra food",
                UpgradeChoice::LargerGrid => "larger grid",
                UpgradeChoice::SlowerPace => "slower pace",
            };
            format!("[{}] {label}", index + 1)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Immutable grid of glyphs plus HUD, built from one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of columns in the play field.
    pub width: u32,
    /// Number of rows in the play field.
    pub height: u32,
    /// HUD values shown alongside the grid.
    pub hud: Hud,
    cells: Vec<Glyph>,
}

impl Scene {
    /// Lays out the snapshot, rejecting grids without cells or entities outside the grid.
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Result<Self, RenderingError> {
        let (width, height) = (snapshot.grid_width, snapshot.grid_height);
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptyGrid { width, height });
        }

        let mut scene = Self {
            width,
            height,
            hud: Hud::from_snapshot(snapshot),
            cells: vec![Glyph::Empty; width as usize * height as usize],
        };

        for food in &snapshot.food {
            scene.paint(food.cell, Glyph::Food)?;
        }
        let engaged = snapshot.engagement.map(|engagement| engagement.enemy);
        for enemy in &snapshot.enemies {
            let glyph = if Some(enemy.id) == engaged {
                Glyph::EngagedEnemy
            } else {
                Glyph::Enemy {
                    hit_points: enemy.hit_points,
                }
            };
            scene.paint(enemy.cell, glyph)?;
        }
        let mut segments = snapshot.snake.iter();
        if let Some(head) = segments.next() {
            scene.paint(*head, Glyph::Head(snapshot.direction))?;
        }
        for segment in segments {
            scene.paint(*segment, Glyph::Body)?;
        }

        Ok(scene)
    }

    /// Glyph at the provided cell, or `None` outside the play field.
    #[must_use]
    pub fn glyph_at(&self, cell: CellCoord) -> Option<Glyph> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Bordered rows from the top of the grid (highest `y`) to the bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let border: String = std::iter::repeat(Glyph::Border.symbol())
            .take(self.width as usize + 2)
            .collect();

        let mut lines = Vec::with_capacity(self.height as usize + 2);
        lines.push(border.clone());
        for row in self.cells.chunks(self.width as usize).rev() {
            let mut line = String::with_capacity(row.len() + 2);
            line.push(Glyph::Border.symbol());
            line.extend(row.iter().map(|glyph| glyph.symbol()));
            line.push(Glyph::Border.symbol());
            lines.push(line);
        }
        lines.push(border);
        lines
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let x = u32::try_from(cell.x()).ok()?;
        let y = u32::try_from(cell.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn paint(&mut self, cell: CellCoord, glyph: Glyph) -> Result<(), RenderingError> {
        let index = self
            .index(cell)
            .ok_or(RenderingError::CellOutOfBounds {
                x: cell.x(),
                y: cell.y(),
            })?;
        self.cells[index] = glyph;
        Ok(())
    }
}

/// Renders the scene and its status line as plain text.
#[must_use]
pub fn render_text(scene: &Scene) -> String {
    let mut text = scene.lines().join("\n");
    text.push('\n');
    text.push_str(&scene.hud.status_line());
    text.push('\n');
    text
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Heading shown before the first frame.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Decision returned by the per-frame update closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Present the current frame and stop.
    Exit,
}

/// Rendering backend capable of presenting Snake Survival scenes.
pub trait RenderingBackend {
    /// Runs the backend until the update closure requests an exit.
    ///
    /// The closure receives the simulated frame delta and may replace the
    /// scene with a fresh one built from the latest snapshot.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl;
}

/// Headless backend that advances at a fixed frame delta and writes text frames.
#[derive(Debug)]
pub struct TextBackend<W: Write> {
    writer: W,
    frame_dt: Duration,
    render_every: u32,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend that prints every `render_every`-th frame; zero prints only the last.
    #[must_use]
    pub fn new(writer: W, frame_dt: Duration, render_every: u32) -> Self {
        Self {
            writer,
            frame_dt,
            render_every,
        }
    }

    fn write_frame(&mut self, frame: u64, scene: &Scene) -> AnyResult<()> {
        writeln!(self.writer, "-- frame {frame} --")
            .and_then(|()| self.writer.write_all(render_text(scene).as_bytes()))
            .context("failed to write frame")
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl,
    {
        let Presentation { title, mut scene } = presentation;
        writeln!(self.writer, "{title}").context("failed to write title")?;

        let mut frame: u64 = 0;
        loop {
            let control = update_scene(self.frame_dt, &mut scene);
            frame += 1;

            let due = self.render_every > 0 && frame % u64::from(self.render_every) == 0;
            if due || control == FrameControl::Exit {
                self.write_frame(frame, &scene)?;
            }
            if control == FrameControl::Exit {
                break;
            }
        }
        self.writer.flush().context("failed to flush frames")
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The snapshot describes a grid without cells.
    #[error("grid must contain at least one cell (received {width}x{height})")]
    EmptyGrid {
        /// Reported number of columns.
        width: u32,
        /// Reported number of rows.
        height: u32,
    },
    /// An entity lies outside the reported grid bounds.
    #[error("cell ({x}, {y}) lies outside the grid")]
    CellOutOfBounds {
        /// Column of the offending cell.
        x: i32,
        /// Row of the offending cell.
        y: i32,
    },
}
