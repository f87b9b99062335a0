#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven orchestrator that owns the world and every gameplay system.
//!
//! Each external call is turned into a world command. The events it produces
//! are handed to the systems in a fixed order (movement, combat, spawning,
//! foraging) and the commands they answer with are applied immediately. The
//! pump repeats until a round produces no new events, so a single
//! [`Simulation::advance`] resolves every consequence of the elapsed time.

use std::time::Duration;

use snake_survival_core::{
    Command, ConfigError, Direction, Event, MatchConfig, MatchSnapshot, UpgradeChoice,
};
use snake_survival_system_combat::{self as combat, Combat};
use snake_survival_system_foraging::{self as foraging, Foraging};
use snake_survival_system_movement::Movement;
use snake_survival_system_spawning::{self as spawning, Spawning};
use snake_survival_world::{self as world, query, World};
use tracing::{debug, info};

/// Mixed into the match seed so foraging decisions do not mirror world placement.
const FORAGING_SEED_SALT: u64 = 0xf0_4a6e_0d5e_ed00;

/// Owns a match and drives it one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    movement: Movement,
    combat: Combat,
    spawning: Spawning,
    foraging: Foraging,
    notifications: Vec<Event>,
}

impl Simulation {
    /// Validates the configuration and prepares a match in the countdown state.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        let world = World::new(config)?;
        let config = query::config(&world);

        let combat = Combat::new(combat::Config::new(config.damage_interval()));
        let spawning = Spawning::new(spawning::Config::new(
            config.spawn_interval(),
            config.enemies.spawn_interval_decay,
            config.spawn_interval_floor(),
        ));
        let foraging = Foraging::new(foraging::Config::new(
            config.attraction_interval(),
            config.eating_interval(),
            config.food.attraction_radius,
            config.seed ^ FORAGING_SEED_SALT,
        ));
        info!(
            width = config.grid.width,
            height = config.grid.height,
            seed = config.seed,
            "simulation created"
        );

        Ok(Self {
            world,
            movement: Movement::default(),
            combat,
            spawning,
            foraging,
            notifications: Vec::new(),
        })
    }

    /// Advances the match by one frame of `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.submit(Command::Tick { dt });
    }

    /// Buffers a directional intent.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.submit(Command::QueueDirection { direction });
    }

    /// Resets the match back to the countdown.
    pub fn request_restart(&mut self) {
        self.submit(Command::RequestRestart);
    }

    /// Resolves one pending level-up with the provided upgrade.
    pub fn choose_upgrade(&mut self, choice: UpgradeChoice) {
        self.submit(Command::ChooseUpgrade { choice });
    }

    /// Applies an arbitrary command and lets every system react to it.
    ///
    /// Adapters use this for scenario seeding such as explicit food or enemy
    /// placement.
    pub fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pump(events);
    }

    /// Read-only access to the authoritative world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Presentation snapshot including the enemy spawn timer fraction.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        let mut snapshot = query::snapshot(&self.world);
        snapshot.enemy_spawn_progress = self.spawning.progress();
        snapshot
    }

    /// Takes every event emitted since the previous drain, in emission order.
    pub fn drain_notifications(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.notifications)
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        let mut commands = Vec::new();

        while !events.is_empty() {
            for event in &events {
                if let Event::MatchStateChanged { state } = event {
                    debug!(?state, "match state changed");
                }
            }

            let mut next = Vec::new();

            self.movement
                .handle(&events, query::move_interval(&self.world), &mut commands);
            self.apply_all(&mut commands, &mut next);

            self.combat.handle(
                &events,
                query::match_state(&self.world),
                query::engagement(&self.world),
                &mut commands,
            );
            self.apply_all(&mut commands, &mut next);

            self.spawning
                .handle(&events, query::match_state(&self.world), &mut commands);
            self.apply_all(&mut commands, &mut next);

            let food = query::food_view(&self.world);
            let enemies = query::enemy_view(&self.world);
            self.foraging.handle(
                &events,
                query::match_state(&self.world),
                &food,
                &enemies,
                |cell| query::is_cell_free(&self.world, cell),
                &mut commands,
            );
            self.apply_all(&mut commands, &mut next);

            self.notifications.append(&mut events);
            events = next;
        }
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }
}
