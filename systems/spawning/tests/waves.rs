use std::time::Duration;

use arkadien_core::{Command, EnemyKind, Event, GamePhase, Vec3};
use arkadien_system_movement::WaypointPath;
use arkadien_system_spawning::{authored_waves, Config, WaveScheduler, WaveStart};
use arkadien_world::{self as world, query, World, WorldOptions};

const TICK: Duration = Duration::from_millis(100);

struct Harness {
    world: World,
    scheduler: WaveScheduler,
    log: Vec<Event>,
}

impl Harness {
    fn new() -> Self {
        let path = WaypointPath::new(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)])
            .expect("valid path");
        let mut harness = Self {
            world: World::new(path, WorldOptions::default()),
            scheduler: WaveScheduler::new(Config::default()),
            log: Vec::new(),
        };
        harness.execute(vec![Command::SetPhase {
            phase: GamePhase::Playing,
        }]);
        harness
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.log.extend(events.iter().cloned());
        events
    }

    fn start(&mut self) -> WaveStart {
        let mut commands = Vec::new();
        let outcome = self
            .scheduler
            .start_next_wave(query::wave(&self.world), &mut commands);
        let _ = self.execute(commands);
        outcome
    }

    fn step(&mut self) {
        let mut events = self.execute(vec![Command::Tick { dt: TICK }]);
        loop {
            let mut commands = Vec::new();
            let view = query::enemy_view(&self.world);
            self.scheduler.handle(&events, &view, &mut commands);
            if commands.is_empty() {
                break;
            }
            events = self.execute(commands);
        }
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.log.iter().filter(|event| predicate(event)).count()
    }
}

#[test]
fn first_wave_spawns_five_schattenwesen_one_second_apart() {
    let mut harness = Harness::new();
    assert_eq!(harness.start(), WaveStart::Started { wave: 1 });
    assert_eq!(query::wave(&harness.world), 1);

    let mut spawn_times = Vec::new();
    for _ in 0..60 {
        let before = harness.log.len();
        harness.step();
        let spawned = harness.log[before..]
            .iter()
            .filter(|event| matches!(event, Event::EnemySpawned { .. }))
            .count();
        for _ in 0..spawned {
            spawn_times.push(query::elapsed(&harness.world).as_millis());
        }
    }

    assert_eq!(spawn_times, vec![1000, 2000, 3000, 4000, 5000]);
    assert_eq!(
        harness.count(|event| matches!(
            event,
            Event::EnemySpawned {
                kind: EnemyKind::Schattenwesen,
                wave: 1,
                ..
            }
        )),
        5
    );
}

#[test]
fn wave_completes_once_every_enemy_left_play() {
    let mut harness = Harness::new();
    let _ = harness.start();

    let mut completed_at = None;
    for _ in 0..200 {
        harness.step();
        if harness.count(|event| matches!(event, Event::WaveCompleted { wave: 1 })) > 0 {
            completed_at = Some(query::elapsed(&harness.world));
            break;
        }
        if harness.scheduler.is_wave_in_progress() && query::enemy_count(&harness.world) > 0 {
            assert_eq!(
                harness.count(|event| matches!(event, Event::WaveCompleted { .. })),
                0
            );
        }
    }

    let completed_at = completed_at.expect("wave 1 completed");
    assert!(completed_at >= Duration::from_millis(6000));
    assert_eq!(query::enemy_count(&harness.world), 0);
    assert_eq!(
        harness.count(|event| matches!(event, Event::EnemyReachedEnd { .. })),
        5
    );
    assert_eq!(query::lives(&harness.world), 15);
    assert!(!harness.scheduler.is_wave_in_progress());
    assert_eq!(harness.start(), WaveStart::Started { wave: 2 });
}

#[test]
fn starting_past_the_last_wave_declares_victory() {
    let mut harness = Harness::new();
    let mut scheduler = WaveScheduler::new(Config::new(
        authored_waves().into_iter().take(1).collect(),
        Duration::from_millis(500),
    ));
    let mut commands = Vec::new();
    assert_eq!(
        scheduler.start_next_wave(1, &mut commands),
        WaveStart::AllWavesComplete
    );
    let events = harness.execute(commands);
    assert!(events.contains(&Event::AllWavesCompleted));
    assert_eq!(query::phase(&harness.world), GamePhase::Victory);
}

#[test]
fn reset_stops_pending_spawns() {
    let mut harness = Harness::new();
    let _ = harness.start();
    for _ in 0..15 {
        harness.step();
    }
    assert_eq!(query::enemy_count(&harness.world), 1);

    let events = harness.execute(vec![Command::Reset]);
    let mut commands = Vec::new();
    harness
        .scheduler
        .handle(&events, &query::enemy_view(&harness.world), &mut commands);
    assert!(commands.is_empty());
    assert!(!harness.scheduler.is_wave_in_progress());
    assert_eq!(query::wave(&harness.world), 0);
}
