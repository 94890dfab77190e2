#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system responsible for emitting tower placement and sale commands.

use arkadien_core::{CellCoord, Command, Event, PlacementError, TowerId, TowerKind, Vec3};

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Cell the tower would occupy, or why it could not be placed.
    pub outcome: Result<CellCoord, PlacementError>,
}

impl PlacementPreview {
    /// Reports whether the preview represents a valid placement location.
    #[must_use]
    pub fn placeable(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Input snapshot distilled from adapter-provided pointer data.
///
/// Positions are points on the ground plane already resolved by the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Position where the player confirmed a placement on this frame.
    pub confirm_at: Option<Vec3>,
    /// Position where the player requested a tower sale on this frame.
    pub sell_at: Option<Vec3>,
}

/// Placement system that remembers the selected tower kind.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    selected: Option<TowerKind>,
}

impl Builder {
    /// Creates a new builder with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Selects the kind placed by subsequent confirmations.
    pub fn select(&mut self, kind: TowerKind) {
        self.selected = Some(kind);
    }

    /// Drops the current selection.
    pub fn cancel(&mut self) {
        self.selected = None;
    }

    /// Kind placed by the next confirmation, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<TowerKind> {
        self.selected
    }

    /// Previews the selected kind at `position`.
    ///
    /// The `check` closure should mirror the world's `query::placement_check`
    /// helper so the preview agrees with the outcome of placing.
    pub fn preview<F>(&self, position: Vec3, check: F) -> Option<PlacementPreview>
    where
        F: FnOnce(TowerKind, Vec3) -> Result<CellCoord, PlacementError>,
    {
        let kind = self.selected?;
        Some(PlacementPreview {
            kind,
            outcome: check(kind, position),
        })
    }

    /// Consumes world events and adapter-derived input to emit placement
    /// commands.
    ///
    /// The selection survives placements and is dropped when the world resets
    /// or the run ends. The `tower_at` closure should mirror the semantics of
    /// the world's `query::tower_at` helper.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Vec3) -> Option<TowerId>,
    {
        for event in events {
            match event {
                Event::WorldReset => self.cancel(),
                Event::PhaseChanged { phase } if phase.is_terminal() => self.cancel(),
                _ => {}
            }
        }

        if let (Some(position), Some(kind)) = (input.confirm_at, self.selected) {
            out.push(Command::PlaceTower { kind, position });
        }

        if let Some(tower) = input.sell_at.and_then(&mut tower_at) {
            out.push(Command::SellTower { tower });
        }
    }
}
