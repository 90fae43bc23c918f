use serde::{Deserialize, Serialize};

use crate::*;

/// Session phase, always derived from the counters and never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    InProgress,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Summary handed to the presentation layer after every move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub done: bool,
    pub exploded: bool,
    pub rows: Coord,
    pub cols: Coord,
    pub flagged_count: CellCount,
    pub revealed_count: CellCount,
    pub mine_count: CellCount,
}

impl GameStatus {
    pub fn new(
        (rows, cols): Coord2,
        mine_count: CellCount,
        flagged_count: CellCount,
        revealed_count: CellCount,
        exploded: bool,
    ) -> Self {
        // more mines than cells leaves no count of safe cells to reach
        let safe_cells = mult(rows, cols).checked_sub(mine_count);
        Self {
            done: exploded || safe_cells == Some(revealed_count),
            exploded,
            rows,
            cols,
            flagged_count,
            revealed_count,
            mine_count,
        }
    }

    pub const fn state(&self) -> EngineState {
        if self.exploded {
            EngineState::Lost
        } else if self.done {
            EngineState::Won
        } else {
            EngineState::InProgress
        }
    }

    /// Mines not yet accounted for by a flag; negative when over-flagged.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_count) - i32::from(self.flagged_count)
    }
}
