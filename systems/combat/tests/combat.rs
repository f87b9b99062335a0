use std::time::Duration;

use snake_survival_core::{CellCoord, Command, DisengageReason, Event, MatchConfig};
use snake_survival_system_combat::{Combat, Config};
use snake_survival_world::{self as world, query, World};

fn engaged_world(hit_points: u32) -> World {
    let mut config = MatchConfig::default();
    config.countdown_seconds = 0.0;
    config.food.max_food_count = 0;
    config.enemies.hit_points = hit_points;
    config.progression.base_xp_to_next = 10_000;
    let mut world = World::new(config).expect("valid config");

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::ZERO,
        },
        &mut events,
    );
    for x in 9..=13 {
        world::apply(
            &mut world,
            Command::PlaceFood {
                cell: CellCoord::new(x, 8),
            },
            &mut events,
        );
        world::apply(&mut world, Command::StepSnake, &mut events);
    }
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            cell: Some(CellCoord::new(14, 8)),
        },
        &mut events,
    );
    world::apply(&mut world, Command::StepSnake, &mut events);
    assert!(query::engagement(&world).is_some());
    world
}

fn advance(world: &mut World, combat: &mut Combat, dt: Duration) -> Vec<Event> {
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    while !events.is_empty() {
        log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        combat.handle(
            &events,
            query::match_state(world),
            query::engagement(world),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
    log
}

#[test]
fn strikes_follow_the_damage_cadence() {
    let mut world = engaged_world(5);
    let mut combat = Combat::new(Config::new(Duration::from_millis(500)));
    assert_eq!(query::snake(&world).len(), 7);

    let _ = advance(&mut world, &mut combat, Duration::from_millis(16));
    let log = advance(&mut world, &mut combat, Duration::from_millis(499));
    assert!(!log.iter().any(|event| matches!(event, Event::EnemyHit { .. })));

    let log = advance(&mut world, &mut combat, Duration::from_millis(1));
    assert!(log.iter().any(|event| matches!(
        event,
        Event::EnemyHit {
            remaining_hit_points: 4,
            ..
        }
    )));
    assert_eq!(query::snake(&world).len(), 6);
}

#[test]
fn enemy_falls_after_one_strike_per_hit_point() {
    let mut world = engaged_world(3);
    let mut combat = Combat::new(Config::new(Duration::from_millis(500)));
    let _ = advance(&mut world, &mut combat, Duration::ZERO);

    let mut log = Vec::new();
    for _ in 0..6 {
        log.extend(advance(&mut world, &mut combat, Duration::from_millis(250)));
    }

    let hits = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyHit { .. }))
        .count();
    assert_eq!(hits, 3);
    assert!(log.iter().any(|event| matches!(
        event,
        Event::EngagementEnded {
            reason: DisengageReason::EnemyDefeated,
            ..
        }
    )));
    assert_eq!(query::snake(&world).len(), 4);
    assert!(query::engagement(&world).is_none());
}
