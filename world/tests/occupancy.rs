use std::{collections::HashSet, time::Duration};

use snake_survival_core::{
    CellCoord, Command, Direction, Event, GameOverReason, MatchConfig, MatchState,
};
use snake_survival_world::{apply, query, World};

fn small_config(width: u32, height: u32, max_food_count: u32) -> MatchConfig {
    let mut config = MatchConfig::default();
    config.seed = 99;
    config.countdown_seconds = 0.0;
    config.grid.width = width;
    config.grid.height = height;
    config.food.max_food_count = max_food_count;
    config.progression.base_xp_to_next = 10_000;
    config
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn start(config: MatchConfig) -> World {
    let mut world = World::new(config).expect("valid config");
    let _ = run(
        &mut world,
        Command::Tick {
            dt: Duration::ZERO,
        },
    );
    world
}

#[test]
fn random_spawns_never_overlap_until_board_fills() {
    let mut world = start(small_config(5, 5, 2));
    let free_cells = 25 - 2 - 2;

    for _ in 0..free_cells {
        let events = run(&mut world, Command::SpawnEnemy { cell: None });
        assert!(matches!(events.as_slice(), [Event::EnemySpawned { .. }]));
    }

    let snake: HashSet<CellCoord> = query::snake(&world).cells().collect();
    let food: HashSet<CellCoord> = query::food_view(&world).iter().map(|f| f.cell).collect();
    let enemies: Vec<CellCoord> = query::enemy_view(&world).iter().map(|e| e.cell).collect();
    let unique: HashSet<CellCoord> = enemies.iter().copied().collect();
    assert_eq!(unique.len(), enemies.len());
    assert!(unique.is_disjoint(&snake));
    assert!(unique.is_disjoint(&food));
    assert!(enemies.iter().all(|cell| query::grid(&world).contains(*cell)));

    let events = run(&mut world, Command::SpawnEnemy { cell: None });
    assert_eq!(
        events,
        vec![
            Event::BoardFilled,
            Event::MatchStateChanged {
                state: MatchState::GameOver
            },
        ]
    );
    assert_eq!(
        query::game_over_reason(&world),
        Some(GameOverReason::BoardFull)
    );
}

#[test]
fn eating_the_last_free_cell_fills_the_board() {
    let mut world = start(small_config(3, 1, 1));
    let food: Vec<_> = query::food_view(&world).iter().map(|f| f.cell).collect();
    assert_eq!(food, vec![CellCoord::new(2, 0)]);

    let events = run(&mut world, Command::StepSnake);

    assert!(events.contains(&Event::FoodEaten {
        cell: CellCoord::new(2, 0)
    }));
    assert!(events.contains(&Event::BoardFilled));
    assert_eq!(query::match_state(&world), MatchState::GameOver);
    assert_eq!(query::snake(&world).len(), 3);
}

#[test]
fn explicit_placements_respect_occupancy() {
    let mut world = start(small_config(8, 8, 0));
    let head = query::snake(&world).head().expect("head");

    assert_eq!(
        run(&mut world, Command::SpawnEnemy { cell: Some(head) }),
        vec![Event::EnemySpawnRejected { cell: head }]
    );
    let outside = CellCoord::new(8, 0);
    assert_eq!(
        run(&mut world, Command::PlaceFood { cell: outside }),
        vec![Event::FoodPlacementRejected { cell: outside }]
    );

    let cell = CellCoord::new(1, 1);
    let _ = run(&mut world, Command::PlaceFood { cell });
    assert_eq!(
        run(&mut world, Command::SpawnEnemy { cell: Some(cell) }),
        vec![Event::EnemySpawnRejected { cell }]
    );
}

#[test]
fn food_drifts_toward_target_enemy() {
    let mut world = start(small_config(10, 10, 0));
    let food = CellCoord::new(1, 1);
    let _ = run(&mut world, Command::PlaceFood { cell: food });
    let enemy = match run(
        &mut world,
        Command::SpawnEnemy {
            cell: Some(CellCoord::new(3, 1)),
        },
    )
    .as_slice()
    {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn events: {other:?}"),
    };

    let events = run(
        &mut world,
        Command::AttractFood {
            from: food,
            target: Some(enemy),
            to: Some(CellCoord::new(2, 1)),
        },
    );
    assert_eq!(
        events,
        vec![Event::FoodMoved {
            from: food,
            to: CellCoord::new(2, 1)
        }]
    );
    let items = query::food_view(&world).into_vec();
    assert_eq!(items[0].cell, CellCoord::new(2, 1));
    assert_eq!(items[0].target, Some(enemy));

    let onto_enemy = run(
        &mut world,
        Command::AttractFood {
            from: CellCoord::new(2, 1),
            target: Some(enemy),
            to: Some(CellCoord::new(3, 1)),
        },
    );
    assert!(onto_enemy.is_empty());

    let events = run(
        &mut world,
        Command::EnemyEatsFood {
            enemy,
            cell: CellCoord::new(2, 1),
        },
    );
    assert_eq!(
        events,
        vec![Event::FoodDevoured {
            enemy,
            cell: CellCoord::new(2, 1)
        }]
    );
    assert!(query::food_view(&world).is_empty());
}

#[test]
fn attraction_rejects_jumps_and_distant_feeding() {
    let mut world = start(small_config(10, 10, 0));
    let food = CellCoord::new(1, 1);
    let _ = run(&mut world, Command::PlaceFood { cell: food });
    let enemy = match run(
        &mut world,
        Command::SpawnEnemy {
            cell: Some(CellCoord::new(7, 7)),
        },
    )
    .as_slice()
    {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn events: {other:?}"),
    };

    let jump = run(
        &mut world,
        Command::AttractFood {
            from: food,
            target: Some(enemy),
            to: Some(CellCoord::new(3, 3)),
        },
    );
    assert!(jump.is_empty());

    let distant = run(&mut world, Command::EnemyEatsFood { enemy, cell: food });
    assert!(distant.is_empty());
    assert_eq!(query::food_view(&world).len(), 1);
}

#[test]
fn devoured_food_is_replenished() {
    let mut world = start(small_config(10, 10, 1));
    let food = query::food_view(&world).into_vec()[0].cell;
    let enemy_cell = food
        .neighbors()
        .find(|cell| query::is_cell_free(&world, *cell))
        .expect("free neighbour");
    let enemy = match run(
        &mut world,
        Command::SpawnEnemy {
            cell: Some(enemy_cell),
        },
    )
    .as_slice()
    {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn events: {other:?}"),
    };

    let events = run(&mut world, Command::EnemyEatsFood { enemy, cell: food });

    assert_eq!(events[0], Event::FoodDevoured { enemy, cell: food });
    assert!(matches!(events[1], Event::FoodSpawned { .. }));
    assert_eq!(query::food_view(&world).len(), 1);
}

#[test]
fn identical_scripts_replay_identically() {
    let script = [
        Command::Tick {
            dt: Duration::from_millis(2_500),
        },
        Command::SpawnEnemy { cell: None },
        Command::QueueDirection {
            direction: Direction::Up,
        },
        Command::StepSnake,
        Command::SpawnEnemy { cell: None },
        Command::StepSnake,
        Command::RequestRestart,
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        Command::SpawnEnemy { cell: None },
    ];

    let replay = || {
        let mut config = MatchConfig::default();
        config.food.max_food_count = 3;
        let mut world = World::new(config).expect("valid config");
        let mut events = Vec::new();
        for command in script.iter().cloned() {
            apply(&mut world, command, &mut events);
        }
        (events, query::snapshot(&world))
    };

    assert_eq!(replay(), replay());
}
