use alloc::string::String;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// The three classic board presets.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    /// `(rows, cols, mines)`
    pub const fn dimensions(self) -> (Coord, Coord, CellCount) {
        use Difficulty::*;
        match self {
            Beginner => (9, 9, 10),
            Intermediate => (16, 16, 40),
            Expert => (16, 30, 99),
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Beginner => "beginner",
            Intermediate => "intermediate",
            Expert => "expert",
        }
    }

    pub const fn config(self) -> GameConfig {
        let (rows, cols, mines) = self.dimensions();
        GameConfig::new_unchecked((rows, cols), mines)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown difficulty {0:?}, expected beginner, intermediate or expert")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseDifficultyError(s.into()))
    }
}
