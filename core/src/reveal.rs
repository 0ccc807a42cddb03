use alloc::vec::Vec;
use core::ops::BitOr;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoOp,
    MineHit,
    Cleared,
}

impl RevealOutcome {
    /// Whether this outcome could have changed the board
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

/// Merges the outcomes of revealing several cells, a mine hit wins over everything.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (MineHit, _) | (_, MineHit) => MineHit,
            (Cleared, _) | (_, Cleared) => Cleared,
            (NoOp, NoOp) => NoOp,
        }
    }
}

impl Board {
    /// Reveals a single covered cell, cascading through zero-adjacency regions.
    ///
    /// Out-of-bounds, revealed and flagged cells are left alone. Hitting a mine reveals every mine on
    /// the board but keeps their flags.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(cell) = self.get(coords) else {
            return RevealOutcome::NoOp;
        };
        if !cell.is_covered() {
            return RevealOutcome::NoOp;
        }

        if cell.has_mine() {
            log::debug!("Mine hit at {:?}", coords);
            self.reveal_all_mines();
            return RevealOutcome::MineHit;
        }

        self.set_revealed(coords);
        log::debug!(
            "Revealed {:?}, adjacent mines: {}",
            coords,
            cell.adjacent_mines()
        );
        if cell.adjacent_mines() == 0 {
            self.cascade(coords);
        }
        RevealOutcome::Cleared
    }

    /// Reveals the covered neighbours of a revealed number once exactly that many neighbours are
    /// flagged, any other flag count does nothing.
    pub fn chord_reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(cell) = self.get(coords) else {
            return RevealOutcome::NoOp;
        };
        if !cell.is_revealed() || cell.has_mine() || cell.adjacent_mines() == 0 {
            return RevealOutcome::NoOp;
        }

        let flagged = self.count_flagged_neighbors(coords);
        if flagged != cell.adjacent_mines() {
            log::debug!(
                "Chord at {:?} refused: {} flags around a {}",
                coords,
                flagged,
                cell.adjacent_mines()
            );
            return RevealOutcome::NoOp;
        }

        self.iter_neighbors(coords)
            .map(|neighbor| self.reveal(neighbor))
            .fold(RevealOutcome::NoOp, BitOr::bitor)
    }

    /// Worklist flood fill from a revealed zero cell. Numbered cells are revealed but not expanded.
    fn cascade(&mut self, origin: Coord2) {
        let mut pending = Vec::from([origin]);
        let mut opened: usize = 0;

        while let Some(coords) = pending.pop() {
            for neighbor in self.iter_neighbors(coords) {
                let cell = self[neighbor];
                // a zero cell has no mined neighbours, so nothing here can be a mine
                if !cell.is_covered() {
                    continue;
                }

                self.set_revealed(neighbor);
                opened += 1;
                log::trace!(
                    "Flood opened {:?}, adjacent mines: {}",
                    neighbor,
                    cell.adjacent_mines()
                );

                if cell.adjacent_mines() == 0 {
                    pending.push(neighbor);
                }
            }
        }

        log::debug!("Flood fill from {:?} opened {} cells", origin, opened);
    }
}
