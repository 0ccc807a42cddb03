use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Too many mines: {mines} requested, at most {max} allowed")]
    TooManyMines { mines: CellCount, max: CellCount },
}

pub type Result<T> = core::result::Result<T, GameError>;
