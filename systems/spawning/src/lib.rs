#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduling system responsible for emitting enemy spawn commands.
//!
//! Waves are consumed strictly in catalog order. Within a wave the groups
//! spawn one after another: a group emits one enemy per inter-spawn delay and
//! is finished one further delay after its last enemy, at which point the next
//! group starts. Once every group finished, the scheduler polls the live-enemy
//! view until every enemy it spawned left play and then completes the wave.

mod catalog;

use std::time::Duration;

use arkadien_core::{Command, EnemyId, EnemyView, Event, Schedule, WaveDefinition};
use tracing::{debug, info, warn};

pub use catalog::authored_waves;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Debug)]
pub struct Config {
    waves: Vec<WaveDefinition>,
    completion_poll_interval: Duration,
}

impl Config {
    /// Creates a new configuration from a wave catalog and polling cadence.
    #[must_use]
    pub fn new(waves: Vec<WaveDefinition>, completion_poll_interval: Duration) -> Self {
        Self {
            waves,
            completion_poll_interval,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(authored_waves(), DEFAULT_POLL_INTERVAL)
    }
}

/// Outcome of a request to start the next wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveStart {
    /// The wave with the provided number began spawning.
    Started {
        /// One-based number of the wave.
        wave: u32,
    },
    /// A wave is still spawning or has live enemies; nothing changed.
    AlreadyInProgress,
    /// The catalog is exhausted and victory was requested.
    AllWavesComplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Spawning {
        wave: u32,
        group: usize,
        spawned: u32,
    },
    Monitoring {
        wave: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    GroupStep,
    CompletionPoll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Timer {
    due: Duration,
    kind: TimerKind,
}

/// Sequential wave spawner driven by simulated time.
#[derive(Debug)]
pub struct WaveScheduler {
    waves: Vec<WaveDefinition>,
    completion_poll_interval: Duration,
    clock: Duration,
    timers: Schedule<Timer>,
    phase: Phase,
    tracked: Vec<EnemyId>,
}

impl WaveScheduler {
    /// Creates an idle scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            waves: config.waves,
            completion_poll_interval: config.completion_poll_interval,
            clock: Duration::ZERO,
            timers: Schedule::new(),
            phase: Phase::Idle,
            tracked: Vec::new(),
        }
    }

    /// Number of waves in the catalog.
    #[must_use]
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Reports whether a wave is spawning or still has enemies in play.
    #[must_use]
    pub fn is_wave_in_progress(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Reports whether the active wave still has groups left to spawn.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        matches!(self.phase, Phase::Spawning { .. })
    }

    /// Number of the wave currently spawning or in play.
    #[must_use]
    pub fn active_wave(&self) -> Option<u32> {
        match self.phase {
            Phase::Idle => None,
            Phase::Spawning { wave, .. } | Phase::Monitoring { wave } => Some(wave),
        }
    }

    /// Enemies spawned for the active wave, alive or not.
    #[must_use]
    pub fn tracked_enemies(&self) -> &[EnemyId] {
        &self.tracked
    }

    /// Starts the wave following `current_wave`, the number of waves
    /// started so far.
    ///
    /// Pushes `Command::AdvanceWave` when a wave starts and
    /// `Command::DeclareVictory` once the catalog is exhausted.
    pub fn start_next_wave(&mut self, current_wave: u32, out: &mut Vec<Command>) -> WaveStart {
        if self.is_wave_in_progress() {
            warn!(wave = ?self.active_wave(), "wave already in progress");
            return WaveStart::AlreadyInProgress;
        }

        let index = usize::try_from(current_wave).unwrap_or(usize::MAX);
        let Some(definition) = self.waves.get(index) else {
            info!(waves = self.waves.len(), "wave catalog exhausted");
            out.push(Command::DeclareVictory);
            return WaveStart::AllWavesComplete;
        };

        let wave = current_wave.saturating_add(1);
        info!(wave, enemies = definition.enemy_count(), "wave started");
        out.push(Command::AdvanceWave);

        self.tracked.clear();
        self.timers.clear();
        self.phase = Phase::Spawning {
            wave,
            group: 0,
            spawned: 0,
        };
        match definition.groups().first() {
            Some(group) => self.schedule(self.clock, group.inter_spawn_delay, TimerKind::GroupStep),
            None => self.begin_monitoring(wave, self.clock),
        }
        WaveStart::Started { wave }
    }

    /// Consumes world events and the live-enemy view to emit spawn and
    /// completion commands.
    pub fn handle(&mut self, events: &[Event], enemies: &EnemyView, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.clock = self.clock.saturating_add(*dt),
                Event::EnemySpawned { enemy, wave, .. } if Some(*wave) == self.active_wave() => {
                    self.tracked.push(*enemy);
                }
                Event::WorldReset => self.reset(),
                _ => {}
            }
        }

        while let Some(timer) = self.timers.pop_due(self.clock) {
            match timer.kind {
                TimerKind::GroupStep => self.step_group(timer.due, out),
                TimerKind::CompletionPoll => self.poll_completion(timer.due, enemies, out),
            }
        }
    }

    /// Returns to idle, dropping the active wave and every pending timer.
    pub fn reset(&mut self) {
        self.clock = Duration::ZERO;
        self.timers.clear();
        self.phase = Phase::Idle;
        self.tracked.clear();
    }

    fn schedule(&mut self, from: Duration, delay: Duration, kind: TimerKind) {
        self.timers.schedule_at(
            from.saturating_add(delay),
            Timer {
                due: from.saturating_add(delay),
                kind,
            },
        );
    }

    fn step_group(&mut self, due: Duration, out: &mut Vec<Command>) {
        let Phase::Spawning {
            wave,
            group,
            spawned,
        } = self.phase
        else {
            return;
        };
        let Some(definition) = wave_index(wave).and_then(|index| self.waves.get(index)) else {
            self.phase = Phase::Idle;
            return;
        };
        let Some(current) = definition.groups().get(group).copied() else {
            self.begin_monitoring(wave, due);
            return;
        };

        if spawned < current.count {
            out.push(Command::SpawnEnemy {
                kind: current.kind,
                wave,
            });
            self.phase = Phase::Spawning {
                wave,
                group,
                spawned: spawned + 1,
            };
            self.schedule(due, current.inter_spawn_delay, TimerKind::GroupStep);
            return;
        }

        debug!(wave, group, kind = %current.kind, "spawn group finished");
        match definition.groups().get(group + 1).copied() {
            Some(next) => {
                self.phase = Phase::Spawning {
                    wave,
                    group: group + 1,
                    spawned: 0,
                };
                self.schedule(due, next.inter_spawn_delay, TimerKind::GroupStep);
            }
            None => self.begin_monitoring(wave, due),
        }
    }

    fn begin_monitoring(&mut self, wave: u32, from: Duration) {
        self.phase = Phase::Monitoring { wave };
        self.schedule(from, self.completion_poll_interval, TimerKind::CompletionPoll);
    }

    fn poll_completion(&mut self, due: Duration, enemies: &EnemyView, out: &mut Vec<Command>) {
        let Phase::Monitoring { wave } = self.phase else {
            return;
        };

        if self.tracked.iter().any(|enemy| enemies.contains(*enemy)) {
            self.schedule(due, self.completion_poll_interval, TimerKind::CompletionPoll);
            return;
        }

        debug!(wave, spawned = self.tracked.len(), "every enemy of the wave left play");
        self.phase = Phase::Idle;
        self.tracked.clear();
        out.push(Command::CompleteWave { wave });
    }
}

fn wave_index(wave: u32) -> Option<usize> {
    usize::try_from(wave.checked_sub(1)?).ok()
}
