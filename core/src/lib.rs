#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use best_time::*;
pub use board::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use reveal::*;
pub use types::*;

mod best_time;
mod board;
mod difficulty;
mod engine;
mod error;
mod generator;
mod reveal;
mod types;

/// Cells in the 3x3 block around the first click that never receive a mine.
pub const SAFE_ZONE_CELLS: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that the board is non-empty and that the mines fit outside the safe zone with at
    /// least one more safe cell to spare.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        let config = Self::new_unchecked(size, mines);
        let max = config.max_mines();
        if mines > max {
            return Err(GameError::TooManyMines { mines, max });
        }
        Ok(config)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Largest mine count accepted by [`GameConfig::new`] for this size.
    pub const fn max_mines(&self) -> CellCount {
        self.total_cells().saturating_sub(SAFE_ZONE_CELLS + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_board() {
        assert_eq!(GameConfig::new((0, 9), 1), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new((9, 0), 1), Err(GameError::InvalidSize));
    }

    #[test]
    fn mines_must_leave_room_for_safe_zone() {
        assert_eq!(
            GameConfig::new((4, 4), 7),
            Err(GameError::TooManyMines { mines: 7, max: 6 })
        );
        assert!(GameConfig::new((4, 4), 6).is_ok());
    }

    #[test]
    fn tiny_board_accepts_no_mines_at_all() {
        assert_eq!(
            GameConfig::new((3, 3), 1),
            Err(GameError::TooManyMines { mines: 1, max: 0 })
        );
    }
}
