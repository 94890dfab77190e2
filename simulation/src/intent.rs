//! Discrete player intents resolved by the adapter layer.

use arkadien_core::{TowerKind, Vec3};

/// Player request handed to the simulation between steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Leave the menu and begin the run.
    StartGame,
    /// Select the kind placed by subsequent confirmations.
    SelectTower(TowerKind),
    /// Drop the current tower selection.
    CancelPlacement,
    /// Place the selected kind at a resolved ground position.
    PlaceAt(Vec3),
    /// Sell the tower standing at a resolved ground position.
    SellAt(Vec3),
    /// Start the next wave if none is running.
    RequestNextWave,
    /// Suspend the running game.
    Pause,
    /// Continue a paused game.
    Resume,
    /// Clear the run and return to the menu with starting resources.
    Restart,
}

impl Intent {
    /// Resolves a keyboard key name to its intent.
    ///
    /// `1` to `4` select tower kinds in hotkey order, `Escape` cancels the
    /// selection and `Space` requests the next wave.
    #[must_use]
    pub fn from_hotkey(key: &str) -> Option<Self> {
        match key {
            "1" | "2" | "3" | "4" => {
                let index = usize::from(key.as_bytes()[0] - b'1');
                TowerKind::ALL.get(index).copied().map(Self::SelectTower)
            }
            "Escape" => Some(Self::CancelPlacement),
            " " | "Space" => Some(Self::RequestNextWave),
            _ => None,
        }
    }
}
