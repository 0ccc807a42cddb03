use ndarray::Array2;

/// Single coordinate axis, used for rows, columns and board dimensions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    (a as CellCount).saturating_mul(b as CellCount)
}

/// Whether `coords` falls inside a board of `size`.
pub const fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 < size.0 && coords.1 < size.1
}

/// Whether `a` and `b` are the same cell or touch, diagonals included.
pub const fn within_one(a: Coord2, b: Coord2) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        let size = (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(center, size)
    }
}

/// Row/column offsets of the eight surrounding cells.
const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn offset(center: Coord2, (dr, dc): (i8, i8), size: Coord2) -> Option<Coord2> {
    let row = center.0.checked_add_signed(dr)?;
    let col = center.1.checked_add_signed(dc)?;
    in_bounds((row, col), size).then_some((row, col))
}

/// Iterates over the up-to-8 in-bounds neighbours of a cell, never the cell itself.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    size: Coord2,
    next: usize,
}

impl NeighborIter {
    pub fn new(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            next: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = OFFSETS.get(self.next) {
            self.next += 1;
            if let Some(coords) = offset(self.center, delta, self.size) {
                return Some(coords);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(OFFSETS.len() - self.next))
    }
}
