use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One square of the minefield.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    revealed: bool,
    has_mine: bool,
    flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Mines among the up-to-8 surrounding cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    /// Hidden and not flagged, so a reveal would act on it.
    pub const fn is_covered(self) -> bool {
        !self.revealed && !self.flagged
    }
}

/// A `rows x cols` grid of cells, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Unrevealed, unflagged and mine-free.
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    /// Builds a board with mines exactly at `mine_coords`; duplicates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }

        let mut board = Self::new(size);
        for &coords in mine_coords {
            if !board.contains(coords) {
                return Err(GameError::InvalidCoords);
            }
            board.place_mine(coords);
        }
        board.compute_adjacency();
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions always come from a `Coord2`
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.contains(coords)
            .then(|| self.cells[coords.to_nd_index()])
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// All coordinates in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.iter_coords().map(|coords| (coords, self[coords]))
    }

    pub fn unrevealed_count(&self) -> CellCount {
        self.count_where(|cell| !cell.revealed)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_where(|cell| cell.flagged)
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].flagged)
            .count();
        // at most 8
        count as u8
    }

    fn count_where(&self, pred: impl Fn(&Cell) -> bool) -> CellCount {
        let count = self.cells.iter().filter(|cell| pred(cell)).count();
        CellCount::try_from(count).unwrap_or(CellCount::MAX)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    pub(crate) fn place_mine(&mut self, coords: Coord2) {
        let cell = self.cell_mut(coords);
        if !cell.has_mine {
            cell.has_mine = true;
            self.mine_count += 1;
        }
    }

    pub(crate) fn compute_adjacency(&mut self) {
        for coords in self.iter_coords() {
            let count = self
                .iter_neighbors(coords)
                .filter(|&pos| self[pos].has_mine)
                .count();
            self.cell_mut(coords).adjacent_mines = count as u8;
        }
    }

    pub(crate) fn set_flag(&mut self, coords: Coord2, flagged: bool) {
        self.cell_mut(coords).flagged = flagged;
    }

    pub(crate) fn set_revealed(&mut self, coords: Coord2) {
        self.cell_mut(coords).revealed = true;
    }

    /// Marks every mine as flagged, used as the completion marker on a win.
    pub(crate) fn flag_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.has_mine) {
            cell.flagged = true;
        }
    }

    /// Reveals every mine and leaves their flags alone.
    pub(crate) fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.has_mine) {
            cell.revealed = true;
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_blank() {
        let board = Board::new((9, 9));

        assert_eq!(board.size(), (9, 9));
        assert_eq!(board.mine_count(), 0);
        assert_eq!(board.unrevealed_count(), 81);
        assert!(board.iter_cells().all(|(_, cell)| cell == Cell::default()));
    }

    #[test]
    fn adjacency_counts_match_layout() {
        let board = Board::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board[(1, 1)].adjacent_mines(), 2);
        assert_eq!(board[(0, 1)].adjacent_mines(), 1);
        assert_eq!(board[(0, 2)].adjacent_mines(), 0);
        assert_eq!(board[(2, 1)].adjacent_mines(), 1);
    }

    #[test]
    fn duplicate_mines_count_once() {
        let board = Board::from_mine_coords((2, 2), &[(1, 1), (1, 1)]).unwrap();
        assert_eq!(board.mine_count(), 1);
    }

    #[test]
    fn rejects_out_of_range_mine() {
        assert_eq!(
            Board::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            Board::from_mine_coords((0, 2), &[]),
            Err(GameError::InvalidSize)
        );
    }

    #[test]
    fn get_is_none_outside_board() {
        let board = Board::new((2, 3));
        assert!(board.get((1, 2)).is_some());
        assert!(board.get((2, 0)).is_none());
        assert!(board.get((0, 3)).is_none());
    }

    #[test]
    fn iter_coords_is_row_major() {
        let board = Board::new((2, 2));
        let coords: alloc::vec::Vec<_> = board.iter_coords().collect();
        assert_eq!(coords, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    }
}
