//! Enemy state and the generation-checked arena that owns it.

use arkadien_core::{EnemyId, EnemyKind, EnemyStats, SlowEffect, Vec3};
use arkadien_economy::GameEconomy;
use arkadien_system_movement::WaypointPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Alive,
    Dead,
    ReachedEnd,
}

/// Outcome of a single hit against an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The enemy had already left play.
    Ignored,
    /// The enemy survived the hit.
    Damaged { dealt: u32, remaining: u32 },
    /// The hit was lethal and rewards were paid.
    Killed { dealt: u32 },
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) wave: u32,
    stats: EnemyStats,
    health: u32,
    position: Vec3,
    waypoint_index: usize,
    slow_multiplier: f32,
    lifecycle: Lifecycle,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, wave: u32, position: Vec3) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            wave,
            stats,
            health: stats.max_health,
            position,
            waypoint_index: 0,
            slow_multiplier: 1.0,
            lifecycle: Lifecycle::Alive,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    pub(crate) fn position(&self) -> Vec3 {
        self.position
    }

    pub(crate) fn health(&self) -> u32 {
        self.health
    }

    pub(crate) fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub(crate) fn slow_multiplier(&self) -> f32 {
        self.slow_multiplier
    }

    pub(crate) fn current_speed(&self) -> f32 {
        self.stats.speed * self.slow_multiplier
    }

    /// Walks one tick along `path`. Returns `true` on the transition to the
    /// end of the path, after the base damage was charged.
    pub(crate) fn advance(&mut self, path: &WaypointPath, economy: &mut GameEconomy) -> bool {
        if !self.is_alive() {
            return false;
        }

        let step = path.advance(self.position, self.waypoint_index, self.current_speed());
        self.position = step.position;
        self.waypoint_index = step.waypoint_index;

        if step.reached_end {
            self.reach_end(economy);
            return true;
        }
        false
    }

    /// Applies a hit mitigated by armor. Every hit removes at least one point
    /// of health.
    pub(crate) fn take_damage(&mut self, amount: u32, economy: &mut GameEconomy) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }

        let dealt = mitigated_damage(amount, self.stats.armor);
        self.health = self.health.saturating_sub(dealt);

        if self.health == 0 {
            self.die(economy);
            return DamageOutcome::Killed { dealt };
        }
        DamageOutcome::Damaged {
            dealt,
            remaining: self.health,
        }
    }

    /// Keeps the strongest of the active and the new slow. Returns the
    /// multiplier in effect, or `None` when the enemy already left play.
    pub(crate) fn apply_slow(&mut self, slow: SlowEffect) -> Option<f32> {
        if !self.is_alive() {
            return None;
        }
        self.slow_multiplier = self.slow_multiplier.min(slow.multiplier());
        Some(self.slow_multiplier)
    }

    /// Reverts to full speed. Returns `false` when nothing changed.
    pub(crate) fn restore_speed(&mut self) -> bool {
        if !self.is_alive() || self.slow_multiplier >= 1.0 {
            return false;
        }
        self.slow_multiplier = 1.0;
        true
    }

    fn die(&mut self, economy: &mut GameEconomy) {
        if !self.is_alive() {
            return;
        }
        self.lifecycle = Lifecycle::Dead;
        economy.add_gold(self.stats.gold_reward);
        economy.add_score(self.stats.score_reward);
    }

    fn reach_end(&mut self, economy: &mut GameEconomy) {
        if !self.is_alive() {
            return;
        }
        self.lifecycle = Lifecycle::ReachedEnd;
        economy.lose_life(self.stats.damage_to_base);
    }
}

/// Damage left after flat armor mitigation, never below one.
pub(crate) fn mitigated_damage(amount: u32, armor: u32) -> u32 {
    amount.saturating_sub(armor).max(1)
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    enemy: Option<Enemy>,
}

/// Slot storage for enemies with spawn-order iteration.
#[derive(Clone, Debug, Default)]
pub(crate) struct EnemyArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    spawn_order: Vec<EnemyId>,
}

impl EnemyArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert<F>(&mut self, build: F) -> EnemyId
    where
        F: FnOnce(EnemyId) -> Enemy,
    {
        let id = match self.free.pop() {
            Some(index) => EnemyId::new(index, self.slots[index as usize].generation),
            None => {
                let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
                self.slots.push(Slot::default());
                EnemyId::new(index, 0)
            }
        };
        if let Some(slot) = self.slots.get_mut(id.index() as usize) {
            slot.enemy = Some(build(id));
        }
        self.spawn_order.push(id);
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.enemy.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.enemy.as_mut())
    }

    /// Frees the slot so the handle and every copy of it go stale.
    /// Frees the slot behind `id`. Returns `false` for a stale handle.
    pub(crate) fn remove(&mut self, id: EnemyId) -> bool {
        let Some(slot) = self
            .slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation() && slot.enemy.is_some())
        else {
            return false;
        };
        slot.enemy = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.spawn_order.retain(|entry| *entry != id);
        true
    }

    pub(crate) fn spawn_order(&self) -> &[EnemyId] {
        &self.spawn_order
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.spawn_order.iter().filter_map(|id| self.get(*id))
    }

    pub(crate) fn len(&self) -> usize {
        self.spawn_order.len()
    }

    pub(crate) fn clear(&mut self) {
        let ids = std::mem::take(&mut self.spawn_order);
        for id in ids {
            let removed = self.remove(id);
            debug_assert!(removed, "spawn order listed a stale enemy {id}");
        }
    }
}
