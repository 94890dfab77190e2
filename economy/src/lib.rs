#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared economy, lives and phase state for a single run.
//!
//! One [`GameEconomy`] is constructed by the simulation driver and handed by
//! reference to every component that pays, charges or ends the run. Each
//! mutation records exactly one [`EconomyChange`] for its own field, except
//! [`GameEconomy::reset`] which records one change per field. Observers drain
//! the recorded changes instead of registering callbacks.

use arkadien_core::{GamePhase, PhaseTransitionError};
use tracing::{debug, info};

/// Gold available at the start of every run.
pub const STARTING_GOLD: u32 = 200;
/// Lives available at the start of every run.
pub const STARTING_LIVES: u32 = 20;

/// New value of a single field after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EconomyChange {
    /// Gold after the mutation.
    Gold(u32),
    /// Lives after the mutation.
    Lives(u32),
    /// Score after the mutation.
    Score(u32),
    /// Wave counter after the mutation.
    Wave(u32),
    /// Phase after the mutation.
    Phase(GamePhase),
}

/// Gold, lives, score, wave counter and phase of the current run.
#[derive(Debug)]
pub struct GameEconomy {
    gold: u32,
    lives: u32,
    score: u32,
    wave: u32,
    phase: GamePhase,
    pending: Vec<EconomyChange>,
}

impl GameEconomy {
    /// Creates an economy holding the starting resources in the menu phase.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gold: STARTING_GOLD,
            lives: STARTING_LIVES,
            score: 0,
            wave: 0,
            phase: GamePhase::Menu,
            pending: Vec::new(),
        }
    }

    /// Restores the starting resources and notifies every field once.
    pub fn reset(&mut self) {
        self.gold = STARTING_GOLD;
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.wave = 0;
        self.phase = GamePhase::Menu;
        self.pending.extend([
            EconomyChange::Gold(self.gold),
            EconomyChange::Lives(self.lives),
            EconomyChange::Score(self.score),
            EconomyChange::Wave(self.wave),
            EconomyChange::Phase(self.phase),
        ]);
    }

    /// Current gold balance.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Number of waves started so far.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Active game phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Reports whether `amount` gold is available.
    #[must_use]
    pub const fn can_afford(&self, amount: u32) -> bool {
        self.gold >= amount
    }

    /// Deducts `amount` gold if available.
    ///
    /// Returns `false` without mutating anything when the balance is short.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.gold -= amount;
        self.pending.push(EconomyChange::Gold(self.gold));
        true
    }

    /// Credits `amount` gold.
    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
        self.pending.push(EconomyChange::Gold(self.gold));
    }

    /// Credits `amount` score.
    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
        self.pending.push(EconomyChange::Score(self.score));
    }

    /// Removes `amount` lives, ending the run once none are left.
    pub fn lose_life(&mut self, amount: u32) {
        self.lives = self.lives.saturating_sub(amount);
        self.pending.push(EconomyChange::Lives(self.lives));

        if self.lives == 0 && self.phase != GamePhase::GameOver {
            info!(score = self.score, wave = self.wave, "no lives left, game over");
            self.set_phase(GamePhase::GameOver);
        }
    }

    /// Increments the wave counter.
    pub fn next_wave(&mut self) {
        self.wave = self.wave.saturating_add(1);
        self.pending.push(EconomyChange::Wave(self.wave));
    }

    /// Moves the state machine to `next` if the edge exists.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseTransitionError`] without mutating anything when the
    /// active phase has no edge towards `next`.
    pub fn transition(&mut self, next: GamePhase) -> Result<(), PhaseTransitionError> {
        if !self.phase.can_transition_to(next) {
            return Err(PhaseTransitionError {
                from: self.phase,
                to: next,
            });
        }
        debug!(from = %self.phase, to = %next, "phase transition");
        self.set_phase(next);
        Ok(())
    }

    /// Moves every recorded change into `out`, oldest first.
    pub fn drain_changes(&mut self, out: &mut Vec<EconomyChange>) {
        out.append(&mut self.pending);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.pending.push(EconomyChange::Phase(phase));
    }
}

impl Default for GameEconomy {
    fn default() -> Self {
        Self::new()
    }
}
