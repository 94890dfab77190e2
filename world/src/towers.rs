//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use arkadien_core::{CellCoord, TowerId, TowerKind, TowerStats, Vec3};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// World-space center of the occupied cell.
    pub(crate) position: Vec3,
    /// Seconds left before the tower may attack again.
    pub(crate) cooldown_remaining: f32,
}

impl TowerState {
    pub(crate) fn stats(&self) -> TowerStats {
        self.kind.stats()
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Counts the cooldown down by `seconds`, stopping once the tower is ready.
    pub(crate) fn recharge(&mut self, seconds: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining -= seconds;
        }
    }

    pub(crate) fn start_cooldown(&mut self) {
        self.cooldown_remaining = self.stats().attack_interval();
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a freshly built tower, which may attack on its first tick.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord, position: Vec3) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                cell,
                position,
                cooldown_remaining: 0.0,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    /// Towers in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drops every tower and restarts identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }
}
