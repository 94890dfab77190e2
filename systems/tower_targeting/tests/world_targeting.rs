use std::time::Duration;

use arkadien_core::{Command, EnemyId, EnemyKind, Event, GamePhase, TowerKind, TowerTarget, Vec3};
use arkadien_system_movement::WaypointPath;
use arkadien_system_tower_targeting::TowerTargeting;
use arkadien_world::{self as world, query, World, WorldOptions};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn spawn(world: &mut World, kind: EnemyKind) -> EnemyId {
    run(world, Command::SpawnEnemy { kind, wave: 1 })
        .into_iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(enemy),
            _ => None,
        })
        .expect("enemy spawned")
}

fn tick(world: &mut World, count: usize) {
    for _ in 0..count {
        let _ = run(
            world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
        );
    }
}

fn targets(targeting: &mut TowerTargeting, world: &World) -> Vec<TowerTarget> {
    let mut out = Vec::new();
    targeting.handle(
        query::phase(world),
        &query::tower_view(world),
        &query::enemy_view(world),
        &mut out,
    );
    out
}

#[test]
fn tower_keeps_its_target_until_it_walks_out_of_range() {
    let path = WaypointPath::new(vec![Vec3::new(-10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)])
        .expect("valid path");
    let mut world = World::new(path, WorldOptions::default());
    let _ = run(
        &mut world,
        Command::SetPhase {
            phase: GamePhase::Playing,
        },
    );
    let _ = run(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::WaterWind,
            position: Vec3::new(-9.0, 0.0, 3.0),
        },
    );
    let mut targeting = TowerTargeting::new();

    let runner = spawn(&mut world, EnemyKind::Schattenwesen);
    let first = targets(&mut targeting, &world);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].enemy, runner);

    tick(&mut world, 40);
    let straggler = spawn(&mut world, EnemyKind::Untote);
    let view = query::enemy_view(&world);
    let tower = first[0].tower_position;
    let runner_distance = view.get(runner).expect("runner alive").position.distance(tower);
    let straggler_distance = view
        .get(straggler)
        .expect("straggler alive")
        .position
        .distance(tower);
    assert!(straggler_distance < runner_distance);
    assert_eq!(targets(&mut targeting, &world)[0].enemy, runner);

    tick(&mut world, 80);
    let out = targets(&mut targeting, &world);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].enemy, straggler);
}

#[test]
fn paused_world_yields_no_targets() {
    let path = WaypointPath::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]).expect("valid path");
    let mut world = World::new(path, WorldOptions::default());
    let _ = run(
        &mut world,
        Command::SetPhase {
            phase: GamePhase::Playing,
        },
    );
    let _ = run(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Fire,
            position: Vec3::new(1.0, 0.0, 1.0),
        },
    );
    let _ = spawn(&mut world, EnemyKind::Daemon);
    let mut targeting = TowerTargeting::new();
    assert_eq!(targets(&mut targeting, &world).len(), 1);

    let _ = run(
        &mut world,
        Command::SetPhase {
            phase: GamePhase::Paused,
        },
    );
    assert!(targets(&mut targeting, &world).is_empty());
}
