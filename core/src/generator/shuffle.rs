use alloc::vec::Vec;

use super::*;

/// Uniformly random placement that keeps the 3x3 block around `safe_cell` clear.
///
/// Every eligible coordinate is listed, the list is shuffled with a generator seeded from `seed`,
/// and the first `mines` entries receive a mine. The same seed and safe cell always produce the same
/// board.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleGenerator {
    seed: u64,
    safe_cell: Coord2,
}

impl ShuffleGenerator {
    pub fn new(seed: u64, safe_cell: Coord2) -> Self {
        Self { seed, safe_cell }
    }
}

impl BoardGenerator for ShuffleGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        use rand::prelude::*;

        if config.size.0 == 0 || config.size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if !in_bounds(self.safe_cell, config.size) {
            return Err(GameError::InvalidCoords);
        }

        let mut board = Board::new(config.size);
        let mut eligible: Vec<Coord2> = board
            .iter_coords()
            .filter(|&coords| !within_one(coords, self.safe_cell))
            .collect();

        let mines = usize::from(config.mines);
        if mines > eligible.len() {
            return Err(GameError::TooManyMines {
                mines: config.mines,
                max: CellCount::try_from(eligible.len()).unwrap_or(CellCount::MAX),
            });
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        eligible.shuffle(&mut rng);
        for &coords in &eligible[..mines] {
            board.place_mine(coords);
        }
        board.compute_adjacency();

        log::debug!(
            "Generated {}x{} board with {} mines, safe cell {:?}, seed {}",
            config.size.0,
            config.size.1,
            board.mine_count(),
            self.safe_cell,
            self.seed
        );
        Ok(board)
    }
}
