#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Arkadien defence.
//!
//! The world owns every enemy, tower and projectile together with the single
//! [`GameEconomy`] of the run. All mutation goes through [`apply`]; economy
//! notifications recorded while a command executes are flushed as events at
//! the end of the same call.

mod enemies;
mod placement;
mod projectiles;
mod towers;

use std::time::Duration;

use arkadien_core::{
    AttackStyle, CellCoord, Command, EnemyId, EnemyKind, Event, GamePhase, Schedule, SlowEffect,
    TowerId, TowerKind, Vec3,
};
use arkadien_economy::{EconomyChange, GameEconomy};
use arkadien_system_movement::WaypointPath;
use tracing::{debug, info, warn};

use enemies::{DamageOutcome, Enemy, EnemyArena};
use placement::PlacementGrid;
use projectiles::{Flight, ProjectileSet};

const DEFAULT_GRID_SIZE: u32 = 20;
const DEFAULT_CELL_SIZE: f32 = 2.0;
const DEFAULT_LAUNCH_HEIGHT: f32 = 1.0;

/// Static layout parameters of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldOptions {
    /// Number of cells along each side of the square placement grid.
    pub grid_size: u32,
    /// Side length of a grid cell in world units.
    pub cell_size: f32,
    /// Height above the tower at which projectiles are launched.
    pub projectile_launch_height: f32,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
            projectile_launch_height: DEFAULT_LAUNCH_HEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WorldTimer {
    RestoreSpeed(EnemyId),
}

/// Represents the authoritative world state of a single run.
#[derive(Debug)]
pub struct World {
    economy: GameEconomy,
    path: WaypointPath,
    grid: PlacementGrid,
    enemies: EnemyArena,
    projectiles: ProjectileSet,
    timers: Schedule<WorldTimer>,
    elapsed: Duration,
    launch_height: f32,
    due_timers: Vec<WorldTimer>,
    changes: Vec<EconomyChange>,
}

impl World {
    /// Creates a world in the menu phase with starting resources.
    #[must_use]
    pub fn new(path: WaypointPath, options: WorldOptions) -> Self {
        Self {
            economy: GameEconomy::new(),
            path,
            grid: PlacementGrid::new(options.grid_size, options.cell_size),
            enemies: EnemyArena::new(),
            projectiles: ProjectileSet::new(),
            timers: Schedule::new(),
            elapsed: Duration::ZERO,
            launch_height: options.projectile_launch_height,
            due_timers: Vec::new(),
            changes: Vec::new(),
        }
    }

    fn is_playing(&self) -> bool {
        self.economy.phase() == GamePhase::Playing
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.is_playing() {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.resolve_timers(out_events);
        self.move_enemies(out_events);

        let seconds = dt.as_secs_f32();
        for tower in self.grid.towers_mut().iter_mut() {
            tower.recharge(seconds);
        }
    }

    fn resolve_timers(&mut self, out_events: &mut Vec<Event>) {
        self.timers.drain_due(self.elapsed, &mut self.due_timers);
        for timer in self.due_timers.drain(..) {
            match timer {
                WorldTimer::RestoreSpeed(enemy) => {
                    let restored = self
                        .enemies
                        .get_mut(enemy)
                        .is_some_and(Enemy::restore_speed);
                    if restored {
                        out_events.push(Event::EnemySpeedRestored { enemy });
                    }
                }
            }
        }
    }

    fn move_enemies(&mut self, out_events: &mut Vec<Event>) {
        let order: Vec<EnemyId> = self.enemies.spawn_order().to_vec();
        for id in order {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };
            if !enemy.advance(&self.path, &mut self.economy) {
                continue;
            }

            let kind = enemy.kind;
            let damage_to_base = enemy.stats().damage_to_base;
            let removed = self.enemies.remove(id);
            debug_assert!(removed, "arrived enemy {id} was already gone");
            debug!(enemy = %id, %kind, damage_to_base, "enemy reached the end of the path");
            out_events.push(Event::EnemyReachedEnd {
                enemy: id,
                kind,
                damage_to_base,
            });

            if self.economy.phase().is_terminal() {
                break;
            }
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, wave: u32, out_events: &mut Vec<Event>) {
        if self.economy.phase().is_terminal() {
            debug!(%kind, wave, phase = %self.economy.phase(), "spawn ignored after the run ended");
            return;
        }

        let position = self.path.start();
        let enemy = self
            .enemies
            .insert(|id| Enemy::spawn(id, kind, wave, position));
        out_events.push(Event::EnemySpawned {
            enemy,
            kind,
            wave,
            position,
        });
    }

    fn place_tower(&mut self, kind: TowerKind, position: Vec3, out_events: &mut Vec<Event>) {
        match self.grid.try_place(kind, position, &mut self.economy) {
            Ok(tower) => {
                info!(
                    tower = tower.id.get(),
                    %kind,
                    column = tower.cell.column(),
                    row = tower.cell.row(),
                    "tower placed"
                );
                out_events.push(Event::TowerPlaced {
                    tower: tower.id,
                    kind,
                    cell: tower.cell,
                    position: tower.position,
                });
            }
            Err(reason) => {
                debug!(%kind, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    position,
                    reason,
                });
            }
        }
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        match self.grid.sell(tower, &mut self.economy) {
            Ok(state) => {
                let refund = state.stats().sell_value;
                info!(tower = tower.get(), kind = %state.kind, refund, "tower sold");
                out_events.push(Event::TowerSold {
                    tower,
                    cell: state.cell,
                    refund,
                });
            }
            Err(reason) => {
                debug!(tower = tower.get(), %reason, "tower sale rejected");
                out_events.push(Event::TowerSaleRejected { tower, reason });
            }
        }
    }

    fn fire_tower(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if !self.is_playing() {
            return;
        }
        let Some(state) = self.grid.towers().get(tower) else {
            debug!(tower = tower.get(), "fire request for unknown tower");
            return;
        };
        if !state.is_ready() {
            return;
        }
        let Some(enemy) = self.enemies.get(target).filter(|enemy| enemy.is_alive()) else {
            return;
        };

        let stats = state.stats();
        if state.position.distance(enemy.position()) > stats.range {
            return;
        }

        let kind = state.kind;
        let origin = state.position;
        if let Some(state) = self.grid.towers_mut().get_mut(tower) {
            state.start_cooldown();
        }

        match kind.attack_style() {
            AttackStyle::Melee => {
                out_events.push(Event::MeleeStrike { tower, target });
                self.hit_enemy(target, stats.damage, out_events);
            }
            AttackStyle::Projectile { speed, on_hit } => {
                let position = origin + Vec3::Y * self.launch_height;
                let projectile = self.projectiles.launch(
                    tower,
                    target,
                    position,
                    stats.damage,
                    speed,
                    on_hit,
                );
                out_events.push(Event::ProjectileLaunched {
                    projectile,
                    tower,
                    target,
                    position,
                });
            }
        }
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        if !self.is_playing() {
            return;
        }

        let flights = self.projectiles.take();
        let mut survivors = Vec::with_capacity(flights.len());
        for mut projectile in flights {
            let target_position = self
                .enemies
                .get(projectile.target)
                .filter(|enemy| enemy.is_alive())
                .map(Enemy::position);

            match projectile.fly(target_position) {
                Flight::InFlight => survivors.push(projectile),
                Flight::Lost => {
                    out_events.push(Event::ProjectileExpired {
                        projectile: projectile.id,
                    });
                }
                Flight::Impact => {
                    out_events.push(Event::ProjectileHit {
                        projectile: projectile.id,
                        target: projectile.target,
                    });
                    self.hit_enemy(projectile.target, projectile.damage, out_events);

                    if let Some(aura) = projectile.on_hit {
                        self.apply_slow(projectile.target, aura.target, out_events);
                        let splashed: Vec<EnemyId> = self
                            .enemies
                            .iter()
                            .filter(|enemy| enemy.id != projectile.target && enemy.is_alive())
                            .filter(|enemy| enemy.position().distance(projectile.position) <= aura.radius)
                            .map(|enemy| enemy.id)
                            .collect();
                        for enemy in splashed {
                            self.apply_slow(enemy, aura.splash, out_events);
                        }
                    }
                }
            }
        }
        self.projectiles.restore(survivors);
    }

    fn hit_enemy(&mut self, id: EnemyId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(id) else {
            return;
        };

        match enemy.take_damage(amount, &mut self.economy) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { dealt, remaining } => {
                out_events.push(Event::EnemyDamaged {
                    enemy: id,
                    amount: dealt,
                    remaining,
                });
            }
            DamageOutcome::Killed { dealt } => {
                let kind = enemy.kind;
                let wave = enemy.wave;
                let stats = *enemy.stats();
                let removed = self.enemies.remove(id);
                debug_assert!(removed, "killed enemy {id} was already gone");
                debug!(enemy = %id, %kind, wave, "enemy killed");
                out_events.push(Event::EnemyDamaged {
                    enemy: id,
                    amount: dealt,
                    remaining: 0,
                });
                out_events.push(Event::EnemyKilled {
                    enemy: id,
                    kind,
                    gold_reward: stats.gold_reward,
                    score_reward: stats.score_reward,
                });
            }
        }
    }

    fn apply_slow(&mut self, id: EnemyId, slow: SlowEffect, out_events: &mut Vec<Event>) {
        let Some(multiplier) = self
            .enemies
            .get_mut(id)
            .and_then(|enemy| enemy.apply_slow(slow))
        else {
            return;
        };
        self.timers.schedule_at(
            self.elapsed.saturating_add(slow.duration),
            WorldTimer::RestoreSpeed(id),
        );
        out_events.push(Event::EnemySlowed {
            enemy: id,
            multiplier,
        });
    }

    fn change_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) -> bool {
        match self.economy.transition(phase) {
            Ok(()) => true,
            Err(reason) => {
                warn!(%reason, "phase transition rejected");
                out_events.push(Event::PhaseTransitionRejected { reason });
                false
            }
        }
    }

    fn reserve_cell(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.grid.reserve(cell) {
            out_events.push(Event::CellReserved { cell });
        } else {
            debug!(column = cell.column(), row = cell.row(), "cell reservation ignored");
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.clear();
        self.projectiles.clear();
        self.timers.clear();
        self.grid.clear_towers();
        self.elapsed = Duration::ZERO;
        self.economy.reset();
        info!("world reset");
        out_events.push(Event::WorldReset);
    }

    fn flush_economy(&mut self, out_events: &mut Vec<Event>) {
        self.economy.drain_changes(&mut self.changes);
        out_events.extend(self.changes.drain(..).map(|change| match change {
            EconomyChange::Gold(gold) => Event::GoldChanged { gold },
            EconomyChange::Lives(lives) => Event::LivesChanged { lives },
            EconomyChange::Score(score) => Event::ScoreChanged { score },
            EconomyChange::Wave(wave) => Event::WaveChanged { wave },
            EconomyChange::Phase(phase) => Event::PhaseChanged { phase },
        }));
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::AdvanceProjectiles => world.advance_projectiles(out_events),
        Command::SetPhase { phase } => {
            let _ = world.change_phase(phase, out_events);
        }
        Command::Reset => world.reset(out_events),
        Command::AdvanceWave => world.economy.next_wave(),
        Command::SpawnEnemy { kind, wave } => world.spawn_enemy(kind, wave, out_events),
        Command::CompleteWave { wave } => {
            info!(wave, "wave completed");
            out_events.push(Event::WaveCompleted { wave });
        }
        Command::DeclareVictory => {
            if world.change_phase(GamePhase::Victory, out_events) {
                info!(score = world.economy.score(), "all waves completed");
                out_events.push(Event::AllWavesCompleted);
            }
        }
        Command::PlaceTower { kind, position } => world.place_tower(kind, position, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::ReserveCell { cell } => world.reserve_cell(cell, out_events),
        Command::FireTower { tower, target } => world.fire_tower(tower, target, out_events),
    }
    world.flush_economy(out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use arkadien_core::{
        CellCoord, EnemyId, EnemySnapshot, EnemyView, GamePhase, PlacementError, ProjectileId,
        TowerCooldownSnapshot, TowerCooldownView, TowerId, TowerKind, TowerSnapshot, TowerView,
        Vec3,
    };
    use arkadien_system_movement::WaypointPath;

    /// Active game phase.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.economy.phase()
    }

    /// Current gold balance.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.economy.gold()
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.economy.lives()
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.economy.score()
    }

    /// Number of waves started so far.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.economy.wave()
    }

    /// Simulated time spent in the playing phase since the last reset.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Path every enemy walks.
    #[must_use]
    pub fn path(world: &World) -> &WaypointPath {
        &world.path
    }

    /// Captures the live-enemy set in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    kind: enemy.kind,
                    position: enemy.position(),
                    health: enemy.health(),
                    max_health: enemy.stats().max_health,
                    slow_multiplier: enemy.slow_multiplier(),
                })
                .collect(),
        )
    }

    /// Reports whether the handle resolves to a live enemy.
    #[must_use]
    pub fn is_enemy_alive(world: &World, enemy: EnemyId) -> bool {
        world.enemies.get(enemy).is_some_and(|enemy| enemy.is_alive())
    }

    /// Number of enemies in play.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures every tower in identifier order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .grid
                .towers()
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    cell: tower.cell,
                    position: tower.position,
                })
                .collect(),
        )
    }

    /// Captures the cooldown of every tower in identifier order.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .grid
                .towers()
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    kind: tower.kind,
                    cooldown_remaining: tower.cooldown_remaining.max(0.0),
                })
                .collect(),
        )
    }

    /// Number of towers standing on the grid.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.grid.towers().len()
    }

    /// Tower standing on the cell containing `position`.
    #[must_use]
    pub fn tower_at(world: &World, position: Vec3) -> Option<TowerId> {
        world.grid.tower_at(position)
    }

    /// Reports whether `kind` could be placed at `position` right now, and
    /// on which cell, without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns the [`PlacementError`] a placement command would be rejected with.
    pub fn placement_check(
        world: &World,
        kind: TowerKind,
        position: Vec3,
    ) -> Result<CellCoord, PlacementError> {
        world.grid.check(kind, position, &world.economy)
    }

    /// Cell containing `position`, if it lies on the grid.
    #[must_use]
    pub fn cell_at(world: &World, position: Vec3) -> Option<CellCoord> {
        world.grid.world_to_grid(position)
    }

    /// World-space center of `cell` on the ground plane.
    #[must_use]
    pub fn cell_center(world: &World, cell: CellCoord) -> Vec3 {
        world.grid.grid_to_world(cell)
    }

    /// Reports whether `cell` was reserved against tower placement.
    #[must_use]
    pub fn is_cell_reserved(world: &World, cell: CellCoord) -> bool {
        world.grid.is_reserved(cell)
    }

    /// Number of cells per side and the side length of a cell.
    #[must_use]
    pub fn grid_dimensions(world: &World) -> (u32, f32) {
        (world.grid.size(), world.grid.cell_size())
    }

    /// Captures every projectile in flight in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                tower: projectile.tower,
                target: projectile.target,
                position: projectile.position,
            })
            .collect()
    }

    /// Number of deferred world callbacks not yet due.
    #[must_use]
    pub fn pending_timers(world: &World) -> usize {
        world.timers.len()
    }

    /// Immutable representation of a projectile in flight.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier of the projectile.
        pub id: ProjectileId,
        /// Tower that fired the projectile.
        pub tower: TowerId,
        /// Enemy the projectile homes in on.
        pub target: EnemyId,
        /// Current world position.
        pub position: Vec3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkadien_economy::{STARTING_GOLD, STARTING_LIVES};

    const FRAME: Duration = Duration::from_micros(16_667);

    fn short_path() -> WaypointPath {
        WaypointPath::new(vec![
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
        ])
        .expect("valid path")
    }

    fn playing_world() -> World {
        let mut world = World::new(short_path(), WorldOptions::default());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPhase {
                phase: GamePhase::Playing,
            },
            &mut events,
        );
        world
    }

    fn spawn(world: &mut World, kind: EnemyKind) -> EnemyId {
        let mut events = Vec::new();
        apply(world, Command::SpawnEnemy { kind, wave: 1 }, &mut events);
        events
            .iter()
            .find_map(|event| match event {
                Event::EnemySpawned { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .expect("enemy spawned")
    }

    #[test]
    fn ticks_outside_playing_do_not_advance_time() {
        let mut world = World::new(short_path(), WorldOptions::default());
        let mut events = Vec::new();
        apply(&mut world, Command::Tick { dt: FRAME }, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::elapsed(&world), Duration::ZERO);
    }

    #[test]
    fn economy_changes_are_flushed_as_events() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Melee,
                position: Vec3::ZERO,
            },
            &mut events,
        );
        assert!(matches!(events[0], Event::TowerPlaced { kind: TowerKind::Melee, .. }));
        assert_eq!(
            events[1],
            Event::GoldChanged {
                gold: STARTING_GOLD - 80
            }
        );
    }

    #[test]
    fn spawned_enemy_starts_on_the_first_waypoint() {
        let mut world = playing_world();
        let enemy = spawn(&mut world, EnemyKind::Huellen);
        let view = query::enemy_view(&world);
        let snapshot = view.get(enemy).expect("enemy is live");
        assert_eq!(snapshot.position, Vec3::new(-10.0, 0.0, 0.0));
        assert_eq!(snapshot.health, 60);
    }

    #[test]
    fn melee_attack_requires_range_and_ready_cooldown() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Melee,
                position: Vec3::new(-9.0, 0.0, 1.0),
            },
            &mut events,
        );
        let tower = query::tower_view(&world).iter().next().expect("tower").id;
        let enemy = spawn(&mut world, EnemyKind::Schattenwesen);

        events.clear();
        apply(&mut world, Command::FireTower { tower, target: enemy }, &mut events);
        assert_eq!(events[0], Event::MeleeStrike { tower, target: enemy });
        assert_eq!(
            events[1],
            Event::EnemyDamaged {
                enemy,
                amount: 15,
                remaining: 35,
            }
        );

        events.clear();
        apply(&mut world, Command::FireTower { tower, target: enemy }, &mut events);
        assert!(events.is_empty(), "cooldown must block a second strike");
    }

    #[test]
    fn enemies_reaching_the_end_charge_lives_and_leave_play() {
        let mut world = playing_world();
        let enemy = spawn(&mut world, EnemyKind::Huellen);
        let mut events = Vec::new();
        for _ in 0..200 {
            apply(&mut world, Command::Tick { dt: FRAME }, &mut events);
        }
        assert!(events.contains(&Event::EnemyReachedEnd {
            enemy,
            kind: EnemyKind::Huellen,
            damage_to_base: 1,
        }));
        assert!(events.contains(&Event::LivesChanged {
            lives: STARTING_LIVES - 1
        }));
        assert!(!query::is_enemy_alive(&world, enemy));
        assert_eq!(query::enemy_count(&world), 0);
    }

    #[test]
    fn victory_is_rejected_outside_playing() {
        let mut world = World::new(short_path(), WorldOptions::default());
        let mut events = Vec::new();
        apply(&mut world, Command::DeclareVictory, &mut events);
        assert!(matches!(
            events.as_slice(),
            [Event::PhaseTransitionRejected { .. }]
        ));
        assert_eq!(query::phase(&world), GamePhase::Menu);
    }

    #[test]
    fn reset_keeps_reserved_cells_and_restores_resources() {
        let mut world = playing_world();
        let mut events = Vec::new();
        let reserved = CellCoord::new(3, 4);
        apply(&mut world, Command::ReserveCell { cell: reserved }, &mut events);
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Fire,
                position: Vec3::ZERO,
            },
            &mut events,
        );
        let _ = spawn(&mut world, EnemyKind::Daemon);

        events.clear();
        apply(&mut world, Command::Reset, &mut events);
        assert_eq!(events[0], Event::WorldReset);
        assert!(events.contains(&Event::PhaseChanged {
            phase: GamePhase::Menu
        }));
        assert!(query::is_cell_reserved(&world, reserved));
        assert_eq!(query::tower_count(&world), 0);
        assert_eq!(query::enemy_count(&world), 0);
        assert_eq!(query::gold(&world), STARTING_GOLD);
    }
}
