#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that keeps one target per tower from the pushed enemy view.
//!
//! A tower keeps its current target while that enemy is alive and inside the
//! tower's range. Otherwise it picks the closest live enemy in range, and
//! equally distant candidates resolve to the one listed first in the view.

use std::collections::BTreeMap;

use arkadien_core::{EnemyId, EnemyView, GamePhase, TowerId, TowerTarget, TowerView, Vec3};

/// Tower targeting system that remembers assignments between ticks.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    current: BTreeMap<TowerId, EnemyId>,
    seen: Vec<TowerId>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system without remembered targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided snapshots.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments, one per tower that has a target, in tower order.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if phase != GamePhase::Playing {
            return;
        }

        self.seen.clear();
        for tower in towers.iter() {
            self.seen.push(tower.id);
            let range = tower.kind.stats().range;

            let kept = self
                .current
                .get(&tower.id)
                .and_then(|enemy| enemies.get(*enemy))
                .filter(|enemy| tower.position.distance(enemy.position) <= range);

            let chosen = kept.or_else(|| {
                closest_in_range(tower.position, range, enemies)
                    .and_then(|enemy| enemies.get(enemy))
            });

            match chosen {
                Some(enemy) => {
                    let _ = self.current.insert(tower.id, enemy.id);
                    out.push(TowerTarget {
                        tower: tower.id,
                        enemy: enemy.id,
                        tower_position: tower.position,
                        enemy_position: enemy.position,
                    });
                }
                None => {
                    let _ = self.current.remove(&tower.id);
                }
            }
        }

        let seen = &self.seen;
        self.current
            .retain(|tower, _| seen.binary_search(tower).is_ok());
    }

    /// Target remembered for `tower`, if any.
    #[must_use]
    pub fn current_target(&self, tower: TowerId) -> Option<EnemyId> {
        self.current.get(&tower).copied()
    }

    /// Forgets every remembered target.
    pub fn reset(&mut self) {
        self.current.clear();
        self.seen.clear();
    }
}

fn closest_in_range(origin: Vec3, range: f32, enemies: &EnemyView) -> Option<EnemyId> {
    let mut best: Option<(f32, EnemyId)> = None;
    for enemy in enemies.iter() {
        let distance = origin.distance(enemy.position);
        if distance > range {
            continue;
        }
        match best {
            Some((closest, _)) if distance >= closest => {}
            _ => best = Some((distance, enemy.id)),
        }
    }
    best.map(|(_, enemy)| enemy)
}
