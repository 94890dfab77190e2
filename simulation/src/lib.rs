#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step driver that wires the world to the pure systems.
//!
//! One [`Simulation::step`] advances the run by a single tick in a fixed
//! order: enemies move and deferred effects resolve, towers pick targets,
//! ready towers attack, projectiles fly, and finally the wave scheduler reacts
//! to the elapsed time. Player [`Intent`]s are applied between steps.

mod config;
mod intent;
mod presenter;

use std::time::Duration;

use arkadien_core::{Command, Event, GamePhase, TowerTarget, Vec3};
use arkadien_system_builder::{Builder, BuilderInput, PlacementPreview};
use arkadien_system_spawning::{authored_waves, Config as WaveConfig, WaveScheduler, WaveStart};
use arkadien_system_tower_combat::TowerCombat;
use arkadien_system_tower_targeting::TowerTargeting;
use arkadien_world::{self as world, query, World};
use tracing::{debug, info};

pub use config::{ConfigError, SimulationConfig};
pub use intent::Intent;
pub use presenter::{Entity, EntityPresenter, Presentation};

/// A complete run: authoritative world plus every system that drives it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    targeting: TowerTargeting,
    combat: TowerCombat,
    scheduler: WaveScheduler,
    builder: Builder,
    tick: Duration,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Builds a run in the menu phase from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration cannot describe a run.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let tick = config.tick_duration()?;
        let world = World::new(config.path()?, config.world_options()?);
        let scheduler = WaveScheduler::new(WaveConfig::new(
            authored_waves(),
            config.completion_poll_interval(),
        ));

        let mut simulation = Self {
            world,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            scheduler,
            builder: Builder::new(),
            tick,
            targets: Vec::new(),
            commands: Vec::new(),
        };

        let mut events = Vec::new();
        for cell in &config.reserved_cells {
            simulation.apply(Command::ReserveCell { cell: *cell }, &mut events);
        }
        debug!(
            reserved = config.reserved_cells.len(),
            tick_ms = tick.as_secs_f32() * 1000.0,
            "simulation created"
        );
        Ok(simulation)
    }

    /// Read access to the authoritative world for `query` helpers.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current phase of the run.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Duration of one fixed step.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Reports whether a wave is spawning or still has enemies in play.
    #[must_use]
    pub fn is_wave_in_progress(&self) -> bool {
        self.scheduler.is_wave_in_progress()
    }

    /// Number of waves in the catalog.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        self.scheduler.wave_count()
    }

    /// Previews the selected tower kind at `position`.
    #[must_use]
    pub fn placement_preview(&self, position: Vec3) -> Option<PlacementPreview> {
        self.builder.preview(position, |kind, position| {
            query::placement_check(&self.world, kind, position)
        })
    }

    /// Advances the run by one fixed step, appending every resulting event.
    ///
    /// Steps outside [`GamePhase::Playing`] change nothing.
    pub fn step(&mut self, out: &mut Vec<Event>) {
        let mut events = Vec::new();
        self.apply(Command::Tick { dt: self.tick }, &mut events);

        let phase = query::phase(&self.world);
        let enemies = query::enemy_view(&self.world);
        let towers = query::tower_view(&self.world);
        self.targeting
            .handle(phase, &towers, &enemies, &mut self.targets);

        self.commands.clear();
        self.combat.handle(
            phase,
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.apply_pending(&mut events);

        self.apply(Command::AdvanceProjectiles, &mut events);

        let enemies = query::enemy_view(&self.world);
        self.scheduler
            .handle(&events, &enemies, &mut self.commands);
        let seen = events.len();
        self.settle(&mut events, seen);

        self.observe(&events);
        out.append(&mut events);
    }

    /// Applies a player intent, appending every resulting event.
    pub fn handle_intent(&mut self, intent: Intent, out: &mut Vec<Event>) {
        let mut events = Vec::new();
        match intent {
            Intent::StartGame | Intent::Resume => self.apply(
                Command::SetPhase {
                    phase: GamePhase::Playing,
                },
                &mut events,
            ),
            Intent::Pause => self.apply(
                Command::SetPhase {
                    phase: GamePhase::Paused,
                },
                &mut events,
            ),
            Intent::SelectTower(kind) => self.builder.select(kind),
            Intent::CancelPlacement => self.builder.cancel(),
            Intent::PlaceAt(position) => self.build(
                BuilderInput {
                    confirm_at: Some(position),
                    ..BuilderInput::default()
                },
                &mut events,
            ),
            Intent::SellAt(position) => self.build(
                BuilderInput {
                    sell_at: Some(position),
                    ..BuilderInput::default()
                },
                &mut events,
            ),
            Intent::RequestNextWave => self.request_next_wave(&mut events),
            Intent::Restart => {
                self.apply(Command::Reset, &mut events);
                self.targeting.reset();
            }
        }

        self.settle(&mut events, 0);
        self.observe(&events);
        out.append(&mut events);
    }

    /// Clears the run and returns to the menu with starting resources.
    pub fn restart(&mut self, out: &mut Vec<Event>) {
        self.handle_intent(Intent::Restart, out);
    }

    fn request_next_wave(&mut self, events: &mut Vec<Event>) {
        let phase = query::phase(&self.world);
        if phase != GamePhase::Playing {
            debug!(%phase, "wave request ignored outside play");
            return;
        }
        self.commands.clear();
        let outcome = self
            .scheduler
            .start_next_wave(query::wave(&self.world), &mut self.commands);
        if let WaveStart::Started { wave } = outcome {
            info!(wave, "next wave requested");
        }
        self.apply_pending(events);
    }

    fn build(&mut self, input: BuilderInput, events: &mut Vec<Event>) {
        self.commands.clear();
        let world = &self.world;
        self.builder.handle(
            &[],
            input,
            |position| query::tower_at(world, position),
            &mut self.commands,
        );
        self.apply_pending(events);
    }

    /// Lets the scheduler observe the events past `seen` until it stops
    /// issuing commands.
    fn settle(&mut self, events: &mut Vec<Event>, mut seen: usize) {
        loop {
            self.apply_pending(events);
            if seen == events.len() {
                return;
            }
            let enemies = query::enemy_view(&self.world);
            let start = seen;
            seen = events.len();
            self.scheduler
                .handle(&events[start..], &enemies, &mut self.commands);
        }
    }

    fn observe(&mut self, events: &[Event]) {
        self.commands.clear();
        self.builder
            .handle(events, BuilderInput::default(), |_| None, &mut self.commands);
    }

    fn apply_pending(&mut self, events: &mut Vec<Event>) {
        for command in std::mem::take(&mut self.commands) {
            self.apply(command, events);
        }
    }

    fn apply(&mut self, command: Command, events: &mut Vec<Event>) {
        world::apply(&mut self.world, command, events);
    }
}
