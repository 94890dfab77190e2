#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arkadien defence simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod kinds;
mod schedule;

use std::{fmt, time::Duration};

pub use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use kinds::{
    AttackStyle, EnemyKind, EnemyStats, SlowAura, SlowEffect, TowerKind, TowerStats,
    UnknownTowerKind,
};
pub use schedule::Schedule;

/// Top-level game state machine value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start the run.
    Menu,
    /// Simulation advances every tick.
    Playing,
    /// Simulation is frozen until resumed.
    Paused,
    /// Lives were exhausted. Terminal for the run.
    GameOver,
    /// Every authored wave was cleared. Terminal for the run.
    Victory,
}

impl GamePhase {
    /// Reports whether the phase ends the current run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }

    /// Reports whether the state machine permits moving from `self` to `next`.
    ///
    /// `Menu -> Playing`, `Playing <-> Paused`, `Playing -> GameOver` and
    /// `Playing -> Victory` are the only edges. A paused run may still be
    /// forced into `GameOver`, which keeps life loss authoritative regardless
    /// of when it is resolved.
    #[must_use]
    pub const fn can_transition_to(self, next: GamePhase) -> bool {
        matches!(
            (self, next),
            (Self::Menu, Self::Playing)
                | (Self::Playing, Self::Paused)
                | (Self::Paused, Self::Playing)
                | (Self::Playing, Self::GameOver)
                | (Self::Paused, Self::GameOver)
                | (Self::Playing, Self::Victory)
        )
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::GameOver => "game over",
            Self::Victory => "victory",
        };
        f.write_str(label)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock, moves enemies and recharges towers.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves every active projectile once and resolves impacts.
    AdvanceProjectiles,
    /// Requests a transition of the game phase.
    SetPhase {
        /// Phase the world should enter.
        phase: GamePhase,
    },
    /// Restores starting resources and clears every entity from the world.
    Reset,
    /// Increments the wave counter ahead of spawning a new wave.
    AdvanceWave,
    /// Requests that a new enemy be created at the start of the path.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: u32,
    },
    /// Announces that every enemy of the provided wave has left play.
    CompleteWave {
        /// Wave that finished.
        wave: u32,
    },
    /// Announces that the wave catalog is exhausted and forces victory.
    DeclareVictory,
    /// Requests placement of a tower at an already resolved world position.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// World position picked by the input source.
        position: Vec3,
    },
    /// Requests that a tower be sold for its sell value.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Marks a grid cell as unavailable for towers.
    ReserveCell {
        /// Cell to reserve.
        cell: CellCoord,
    },
    /// Requests that a tower perform its attack against the provided enemy.
    FireTower {
        /// Identifier of the attacking tower.
        tower: TowerId,
        /// Enemy selected by targeting.
        target: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Gold balance changed.
    GoldChanged {
        /// Gold after the mutation.
        gold: u32,
    },
    /// Remaining lives changed.
    LivesChanged {
        /// Lives after the mutation.
        lives: u32,
    },
    /// Score changed.
    ScoreChanged {
        /// Score after the mutation.
        score: u32,
    },
    /// Wave counter changed.
    WaveChanged {
        /// Wave counter after the mutation.
        wave: u32,
    },
    /// Game phase changed.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// A requested phase transition is not an edge of the state machine.
    PhaseTransitionRejected {
        /// Reason the transition failed.
        reason: PhaseTransitionError,
    },
    /// Confirms that an enemy entered the world at the start of the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the spawned enemy.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: u32,
        /// Spawn position.
        position: Vec3,
    },
    /// An enemy lost health.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Health removed after armor mitigation.
        amount: u32,
        /// Health left after the hit.
        remaining: u32,
    },
    /// An enemy's speed multiplier changed due to a slow effect.
    EnemySlowed {
        /// Enemy that was slowed.
        enemy: EnemyId,
        /// Multiplier in effect after the slow was applied.
        multiplier: f32,
    },
    /// A slow effect expired and the enemy moves at base speed again.
    EnemySpeedRestored {
        /// Enemy whose speed was restored.
        enemy: EnemyId,
    },
    /// An enemy died and paid out its rewards.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Gold credited for the kill.
        gold_reward: u32,
        /// Score credited for the kill.
        score_reward: u32,
    },
    /// An enemy walked off the end of the path.
    EnemyReachedEnd {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Lives removed from the player.
        damage_to_base: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Grid cell occupied by the tower.
        cell: CellCoord,
        /// World-space center of the cell.
        position: Vec3,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Position provided in the placement request.
        position: Vec3,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was sold and removed.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Cell released by the sale.
        cell: CellCoord,
        /// Gold refunded to the player.
        refund: u32,
    },
    /// Reports that a tower sale request was rejected.
    TowerSaleRejected {
        /// Identifier provided in the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that a cell was reserved against tower placement.
    CellReserved {
        /// Cell that is now unavailable.
        cell: CellCoord,
    },
    /// A tower launched a homing projectile.
    ProjectileLaunched {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
        /// Launch position.
        position: Vec3,
    },
    /// A projectile reached its target.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy that was hit.
        target: EnemyId,
    },
    /// A projectile lost its target before impact and vanished.
    ProjectileExpired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// A melee tower struck its target directly.
    MeleeStrike {
        /// Tower that attacked.
        tower: TowerId,
        /// Enemy that was struck.
        target: EnemyId,
    },
    /// Every enemy of the wave left play.
    WaveCompleted {
        /// Wave that finished.
        wave: u32,
    },
    /// The wave catalog is exhausted.
    AllWavesCompleted,
    /// Every entity was cleared and the starting resources were restored.
    WorldReset,
}

/// Generation-checked handle to an enemy slot.
///
/// A slot index may be reused after the enemy leaves play; the generation
/// distinguishes the new occupant so stale handles never resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId {
    index: u32,
    generation: u32,
}

impl EnemyId {
    /// Creates an enemy handle from a slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the enemy arena.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}g{}", self.index, self.generation)
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single placement grid cell.
///
/// Columns follow the world X axis and rows follow the world Z axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// One group of identical enemies inside a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnGroup {
    /// Kind of enemy emitted by the group.
    pub kind: EnemyKind,
    /// Number of enemies emitted by the group.
    pub count: u32,
    /// Delay between consecutive spawns of the group.
    pub inter_spawn_delay: Duration,
}

impl SpawnGroup {
    /// Creates a spawn group; `delay_ms` is the inter-spawn delay in milliseconds.
    #[must_use]
    pub const fn new(kind: EnemyKind, count: u32, delay_ms: u64) -> Self {
        Self {
            kind,
            count,
            inter_spawn_delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Ordered list of spawn groups that make up one wave.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveDefinition {
    groups: Vec<SpawnGroup>,
}

impl WaveDefinition {
    /// Creates a wave from its groups in spawn order.
    #[must_use]
    pub fn new(groups: Vec<SpawnGroup>) -> Self {
        Self { groups }
    }

    /// Groups in spawn order.
    #[must_use]
    pub fn groups(&self) -> &[SpawnGroup] {
        &self.groups
    }

    /// Total number of enemies the wave emits.
    #[must_use]
    pub fn enemy_count(&self) -> u32 {
        self.groups.iter().map(|group| group.count).sum()
    }
}

/// Immutable representation of a single live enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Handle of the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current world position.
    pub position: Vec3,
    /// Health left.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Multiplier currently applied to base speed.
    pub slow_multiplier: f32,
}

/// Read-only view of the live-enemy set in spawn order.
///
/// The order is preserved exactly as captured so that targeting ties resolve
/// to the first-encountered enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from snapshots in spawn order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for an enemy handle.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Reports whether the enemy is part of the live set.
    #[must_use]
    pub fn contains(&self, id: EnemyId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Grid cell occupied by the tower.
    pub cell: CellCoord,
    /// World-space position of the tower.
    pub position: Vec3,
}

/// Read-only snapshot describing all towers placed within the world.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Cooldown state of a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerCooldownSnapshot {
    /// Identifier of the tower.
    pub tower: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Seconds left before the tower may attack again.
    pub cooldown_remaining: f32,
}

impl TowerCooldownSnapshot {
    /// Reports whether the tower may attack this tick.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }
}

/// Read-only snapshot describing tower cooldowns sorted by tower identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed for a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that owns the assignment.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// World position of the tower.
    pub tower_position: Vec3,
    /// World position of the enemy when the assignment was made.
    pub enemy_position: Vec3,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The run already ended, so placement is disabled.
    #[error("towers cannot be placed after the run ended")]
    InvalidPhase,
    /// The requested position lies outside the placement grid.
    #[error("position lies outside the placement grid")]
    OutOfBounds,
    /// The requested cell already holds a tower or is reserved.
    #[error("cell is already occupied")]
    CellOccupied,
    /// The player cannot cover the tower's cost.
    #[error("not enough gold")]
    InsufficientFunds,
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SaleError {
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
}

/// Errors reported by waypoint paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PathError {
    /// A path needs at least a start and an end.
    #[error("path requires at least 2 waypoints, got {len}")]
    TooShort {
        /// Number of waypoints supplied.
        len: usize,
    },
    /// The index does not address a waypoint of the path.
    #[error("waypoint index {index} is out of range for a path of {len} waypoints")]
    InvalidWaypointIndex {
        /// Requested index.
        index: usize,
        /// Number of waypoints in the path.
        len: usize,
    },
}

/// A requested phase change is not an edge of the game state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("cannot move from {from} to {to}")]
pub struct PhaseTransitionError {
    /// Phase active when the request was made.
    pub from: GamePhase,
    /// Phase that was requested.
    pub to: GamePhase,
}
