#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Arkadien defence run headlessly.

use std::{path::PathBuf, str::FromStr};

use anyhow::{bail, ensure, Context, Result};
use arkadien_core::{Event, GamePhase, TowerKind, Vec3};
use arkadien_simulation::{
    Entity, EntityPresenter, Intent, Presentation, Simulation, SimulationConfig,
};
use arkadien_world::query;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Headless run of the Arkadien tower defence.
#[derive(Debug, Parser)]
#[command(name = "arkadien", version, about)]
struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Towers placed before the first wave, written as `kind@x,z`.
    #[arg(long, num_args = 1.., value_name = "KIND@X,Z")]
    towers: Vec<TowerSpec>,
    /// Upper bound on simulated steps.
    #[arg(long, default_value_t = 216_000)]
    max_ticks: u64,
    /// Number of waves to play; every authored wave when omitted.
    #[arg(long)]
    waves: Option<u32>,
}

/// Tower placement requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerSpec {
    kind: TowerKind,
    position: Vec3,
}

impl FromStr for TowerSpec {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let Some((kind, coordinates)) = value.split_once('@') else {
            bail!("expected `kind@x,z`, got `{value}`");
        };
        let kind = kind.parse::<TowerKind>()?;
        let Some((x, z)) = coordinates.split_once(',') else {
            bail!("expected `x,z` coordinates, got `{coordinates}`");
        };
        let x: f32 = x.trim().parse().with_context(|| format!("invalid x `{x}`"))?;
        let z: f32 = z.trim().parse().with_context(|| format!("invalid z `{z}`"))?;
        ensure!(x.is_finite() && z.is_finite(), "coordinates must be finite");
        Ok(Self {
            kind,
            position: Vec3::new(x, 0.0, z),
        })
    }
}

/// Presenter that reports lifecycle transitions as trace output.
#[derive(Debug, Default)]
struct TracePresenter;

impl EntityPresenter for TracePresenter {
    fn create_visual(&mut self, entity: Entity, position: Vec3) {
        debug!(?entity, x = position.x, z = position.z, "create visual");
    }

    fn remove_visual(&mut self, entity: Entity) {
        debug!(?entity, "remove visual");
    }
}

#[derive(Debug, Default)]
struct Tally {
    waves_completed: u32,
    kills: u32,
    escapes: u32,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveCompleted { wave } => {
                    self.waves_completed += 1;
                    info!(wave, "wave cleared");
                }
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::EnemyReachedEnd { enemy, damage_to_base, .. } => {
                    self.escapes += 1;
                    debug!(%enemy, damage_to_base, "enemy escaped");
                }
                Event::TowerPlacementRejected { kind, reason, .. } => {
                    warn!(%kind, %reason, "tower placement rejected");
                }
                _ => {}
            }
        }
    }
}

/// Entry point for the Arkadien command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    let mut simulation = Simulation::new(&config).context("building the simulation")?;
    let total_waves = u32::try_from(simulation.wave_count()).unwrap_or(u32::MAX);
    let wave_limit = cli.waves.unwrap_or(total_waves);

    let mut presentation = Presentation::new();
    let mut presenter = TracePresenter;
    let mut tally = Tally::default();
    let mut events = Vec::new();

    simulation.handle_intent(Intent::StartGame, &mut events);
    for tower in &cli.towers {
        simulation.handle_intent(Intent::SelectTower(tower.kind), &mut events);
        simulation.handle_intent(Intent::PlaceAt(tower.position), &mut events);
    }
    simulation.handle_intent(Intent::CancelPlacement, &mut events);

    let mut ticks = 0_u64;
    loop {
        presentation.observe(&events, &mut presenter);
        tally.record(&events);
        events.clear();

        if simulation.phase().is_terminal() || ticks >= cli.max_ticks {
            break;
        }
        if !simulation.is_wave_in_progress() {
            // Requesting past the last wave is what declares victory.
            if wave_limit < total_waves && query::wave(simulation.world()) >= wave_limit {
                break;
            }
            simulation.handle_intent(Intent::RequestNextWave, &mut events);
        }
        simulation.step(&mut events);
        ticks += 1;
    }

    let world = simulation.world();
    let phase = query::phase(world);
    let seconds = simulation.tick_duration().as_secs_f64() * ticks as f64;
    info!(%phase, ticks, "run finished");
    println!("outcome: {}", describe(phase, ticks >= cli.max_ticks));
    println!(
        "waves cleared: {} of {}",
        tally.waves_completed,
        wave_limit.min(total_waves)
    );
    println!("waves reached: {}", query::wave(world));
    println!("enemies killed: {}, escaped: {}", tally.kills, tally.escapes);
    println!(
        "gold: {}, lives: {}, score: {}",
        query::gold(world),
        query::lives(world),
        query::score(world)
    );
    println!("towers: {}, simulated: {seconds:.1}s", query::tower_count(world));
    Ok(())
}

fn describe(phase: GamePhase, out_of_ticks: bool) -> &'static str {
    match phase {
        GamePhase::Victory => "victory",
        GamePhase::GameOver => "defeat",
        _ if out_of_ticks => "tick limit reached",
        _ => "stopped after the requested waves",
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
