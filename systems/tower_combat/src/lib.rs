#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orders tower attacks for every targeted tower whose cooldown has elapsed.

use arkadien_core::{
    Command, GamePhase, TowerCooldownSnapshot, TowerCooldownView, TowerTarget,
};
use tracing::trace;

/// Turns target assignments into `Command::FireTower` orders.
///
/// The world owns cooldown state; this system only reads the snapshot taken
/// after the tick recharged it.
#[derive(Debug, Default)]
pub struct TowerCombat {
    ready: Vec<TowerCooldownSnapshot>,
}

impl TowerCombat {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one attack order per ready tower whose target is still inside
    /// the tower's range, in the order the targets were given.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Playing || tower_targets.is_empty() {
            return;
        }

        self.ready.clear();
        self.ready.extend(
            tower_cooldowns
                .into_vec()
                .into_iter()
                .filter(TowerCooldownSnapshot::is_ready),
        );
        if self.ready.is_empty() {
            return;
        }

        for target in tower_targets {
            let Ok(index) = self
                .ready
                .binary_search_by_key(&target.tower, |snapshot| snapshot.tower)
            else {
                continue;
            };
            let kind = self.ready[index].kind;
            let distance = target.tower_position.distance(target.enemy_position);
            if distance > kind.stats().range {
                trace!(tower = ?target.tower, enemy = %target.enemy, distance, "target out of reach");
                continue;
            }

            trace!(tower = ?target.tower, enemy = %target.enemy, %kind, "attack ordered");
            out.push(Command::FireTower {
                tower: target.tower,
                target: target.enemy,
            });
        }
    }
}
