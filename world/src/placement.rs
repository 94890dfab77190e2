//! Placement grid that owns cell occupancy and the towers standing on it.

use arkadien_core::{CellCoord, PlacementError, SaleError, TowerId, TowerKind, Vec3};
use arkadien_economy::GameEconomy;

use crate::towers::{TowerRegistry, TowerState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Free,
    Reserved,
    Tower(TowerId),
}

/// Square grid centered on the world origin.
///
/// Occupancy and the tower registry are only mutated together, so a cell
/// holds a tower exactly when the registry contains a tower on that cell.
#[derive(Debug)]
pub(crate) struct PlacementGrid {
    size: u32,
    cell_size: f32,
    cells: Vec<Cell>,
    towers: TowerRegistry,
}

impl PlacementGrid {
    pub(crate) fn new(size: u32, cell_size: f32) -> Self {
        let capacity_u64 = u64::from(size) * u64::from(size);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            size,
            cell_size,
            cells: vec![Cell::Free; capacity],
            towers: TowerRegistry::new(),
        }
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn half_extent(&self) -> f32 {
        self.size as f32 * self.cell_size / 2.0
    }

    /// Maps a world position onto the cell containing it, ignoring height.
    pub(crate) fn world_to_grid(&self, position: Vec3) -> Option<CellCoord> {
        let column = ((position.x + self.half_extent()) / self.cell_size).floor();
        let row = ((position.z + self.half_extent()) / self.cell_size).floor();
        let bound = self.size as f32;
        if !(0.0..bound).contains(&column) || !(0.0..bound).contains(&row) {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }

    /// World-space center of a cell on the ground plane.
    pub(crate) fn grid_to_world(&self, cell: CellCoord) -> Vec3 {
        let half = self.half_extent();
        Vec3::new(
            cell.column() as f32 * self.cell_size - half + self.cell_size / 2.0,
            0.0,
            cell.row() as f32 * self.cell_size - half + self.cell_size / 2.0,
        )
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.size && cell.row() < self.size {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    fn set_cell(&mut self, cell: CellCoord, value: Cell) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = value;
            }
        }
    }

    pub(crate) fn is_free(&self, cell: CellCoord) -> bool {
        self.cell(cell) == Some(Cell::Free)
    }

    pub(crate) fn is_reserved(&self, cell: CellCoord) -> bool {
        self.cell(cell) == Some(Cell::Reserved)
    }

    /// Runs every placement check without mutating anything.
    ///
    /// Bounds and occupancy are checked before the phase, so an occupied cell
    /// reports `CellOccupied` even after the run ended.
    pub(crate) fn check(
        &self,
        kind: TowerKind,
        position: Vec3,
        economy: &GameEconomy,
    ) -> Result<CellCoord, PlacementError> {
        let cell = self
            .world_to_grid(position)
            .ok_or(PlacementError::OutOfBounds)?;
        if !self.is_free(cell) {
            return Err(PlacementError::CellOccupied);
        }
        if economy.phase().is_terminal() {
            return Err(PlacementError::InvalidPhase);
        }
        if !economy.can_afford(kind.stats().cost) {
            return Err(PlacementError::InsufficientFunds);
        }
        Ok(cell)
    }

    /// Places a tower at the center of the cell containing `position`.
    pub(crate) fn try_place(
        &mut self,
        kind: TowerKind,
        position: Vec3,
        economy: &mut GameEconomy,
    ) -> Result<&TowerState, PlacementError> {
        let cell = self.check(kind, position, economy)?;
        if !economy.spend_gold(kind.stats().cost) {
            return Err(PlacementError::InsufficientFunds);
        }

        let center = self.grid_to_world(cell);
        let id = self.towers.insert(kind, cell, center);
        self.set_cell(cell, Cell::Tower(id));
        self.towers.get(id).ok_or(PlacementError::CellOccupied)
    }

    /// Removes a tower, frees its cell and refunds its sell value.
    pub(crate) fn sell(
        &mut self,
        tower: TowerId,
        economy: &mut GameEconomy,
    ) -> Result<TowerState, SaleError> {
        let state = self.towers.remove(tower).ok_or(SaleError::MissingTower)?;
        self.set_cell(state.cell, Cell::Free);
        economy.add_gold(state.stats().sell_value);
        Ok(state)
    }

    /// Makes a cell permanently unavailable for towers. Returns `false` when
    /// the cell lies outside the grid or is not free.
    pub(crate) fn reserve(&mut self, cell: CellCoord) -> bool {
        if !self.is_free(cell) {
            return false;
        }
        self.set_cell(cell, Cell::Reserved);
        true
    }

    /// Tower standing on the cell containing `position`.
    pub(crate) fn tower_at(&self, position: Vec3) -> Option<TowerId> {
        match self.cell(self.world_to_grid(position)?) {
            Some(Cell::Tower(id)) => Some(id),
            _ => None,
        }
    }

    pub(crate) fn towers(&self) -> &TowerRegistry {
        &self.towers
    }

    pub(crate) fn towers_mut(&mut self) -> &mut TowerRegistry {
        &mut self.towers
    }

    /// Removes every tower while keeping reserved cells.
    pub(crate) fn clear_towers(&mut self) {
        for cell in &mut self.cells {
            if matches!(cell, Cell::Tower(_)) {
                *cell = Cell::Free;
            }
        }
        self.towers.clear();
    }
}
