#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Snake Survival headlessly.

mod autopilot;
mod report;
mod settings;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Serialize;
use snake_survival_core::{MatchSnapshot, MatchState};
use snake_survival_rendering::{
    FrameControl, Presentation, RenderingBackend, RenderingError, Scene, TextBackend,
};
use snake_survival_simulation::Simulation;
use snake_survival_world::query;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    autopilot::{Autopilot, UpgradePolicy},
    report::Report,
};

/// Title line printed before the first frame.
const WELCOME_BANNER: &str = "Welcome to Snake Survival.";

#[derive(Parser, Debug)]
#[command(
    name = "snake-survival",
    version,
    about = "Play Snake Survival headlessly with a scripted pilot"
)]
struct Cli {
    /// TOML file overriding the default match configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed replacing the configured one.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to play before stopping.
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Matches to play; a new one starts after each game over.
    #[arg(long, default_value_t = 1)]
    matches: u32,
    /// Upgrade chosen on every level-up.
    #[arg(long, value_enum, default_value_t = UpgradePolicy::Cycle)]
    upgrade: UpgradePolicy,
    /// Print every Nth frame; zero prints only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: u32,
    /// Print the final snapshot and report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    snapshot: &'a MatchSnapshot,
    report: &'a Report,
}

/// Entry point for the Snake Survival command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    ensure!(cli.fps > 0, "--fps must be positive");
    ensure!(
        cli.seconds.is_finite() && cli.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );
    ensure!(cli.matches > 0, "--matches must be positive");

    let mut config = settings::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let mut simulation = Simulation::new(config).context("invalid match configuration")?;
    info!(
        banner = WELCOME_BANNER,
        fps = cli.fps,
        seconds = cli.seconds,
        "starting headless run"
    );

    let frame_dt = Duration::from_secs(1) / cli.fps;
    let total_frames = (f64::from(cli.seconds) * f64::from(cli.fps)).ceil() as u64;
    let mut pilot = Autopilot::new(cli.upgrade);
    let mut report = Report::default();
    let mut render_error: Option<RenderingError> = None;
    let mut frame: u64 = 0;

    let scene = Scene::from_snapshot(&simulation.snapshot()).context("initial scene")?;
    let presentation = Presentation::new(WELCOME_BANNER, scene);
    let render_every = if cli.json { 0 } else { cli.render_every };
    let mut frames_out = if cli.json {
        Box::new(io::sink()) as Box<dyn io::Write>
    } else {
        Box::new(io::stdout().lock())
    };

    TextBackend::new(&mut frames_out, frame_dt, render_every).run(
        presentation,
        |dt, scene| {
            let snapshot = simulation.snapshot();
            match snapshot.state {
                MatchState::PausedForUpgrade => {
                    simulation.choose_upgrade(pilot.choose_upgrade());
                }
                MatchState::GameOver if report.matches < cli.matches => {
                    debug!(finished = report.matches, "starting next match");
                    simulation.request_restart();
                }
                _ => {
                    if let Some(direction) = pilot.steer(&snapshot) {
                        simulation.queue_direction(direction);
                    }
                }
            }

            simulation.advance(dt);
            report.record(&simulation.drain_notifications());
            frame += 1;

            match Scene::from_snapshot(&simulation.snapshot()) {
                Ok(next) => *scene = next,
                Err(error) => {
                    warn!(%error, "snapshot could not be laid out");
                    render_error = Some(error);
                    return FrameControl::Exit;
                }
            }

            let finished = report.matches >= cli.matches
                && query::match_state(simulation.world()) == MatchState::GameOver;
            if finished || frame >= total_frames {
                FrameControl::Exit
            } else {
                FrameControl::Continue
            }
        },
    )?;
    drop(frames_out);

    if let Some(error) = render_error {
        return Err(error).context("failed to lay out the final frame");
    }

    let snapshot = simulation.snapshot();
    info!(
        frames = frame,
        score = snapshot.progression.score,
        state = ?snapshot.state,
        "headless run finished"
    );

    let stdout = io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(
            stdout,
            &JsonOutput {
                snapshot: &snapshot,
                report: &report,
            },
        )
        .context("failed to write json output")?;
        println!();
        Ok(())
    } else {
        report.write_summary(&snapshot, stdout)
    }
}
