use std::str::FromStr;
use sweeper_core::{Coord, Coord2, Difficulty, ParseDifficultyError};
use thiserror::Error;

/// One line of player input.
///
/// A target of `None` means the typed coordinates cannot exist on any board, the click is dropped
/// the same way the engine drops an out-of-range one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Reveal(Option<Coord2>),
    Flag(Option<Coord2>),
    Chord(Option<Coord2>),
    Restart,
    SetDifficulty(Difficulty),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, type h for help")]
    Unknown(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("{0:?} is not a number")]
    InvalidNumber(String),
    #[error("unexpected {0:?}")]
    TrailingInput(String),
    #[error(transparent)]
    Difficulty(#[from] ParseDifficultyError),
}

pub(crate) const HELP: &str = "\
commands:
  r ROW COL   reveal a cell, or chord a revealed number
  f ROW COL   toggle a flag
  c ROW COL   chord: reveal around a number whose flags are complete
  n           new game
  d NAME      switch to beginner, intermediate or expert
  h           this help
  q           quit";

fn parse_axis(token: Option<&str>, name: &'static str) -> Result<Option<Coord>, ParseCommandError> {
    let token = token.ok_or(ParseCommandError::MissingArgument(name))?;
    let value: i64 = token
        .parse()
        .map_err(|_| ParseCommandError::InvalidNumber(token.into()))?;
    Ok(Coord::try_from(value).ok())
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(ParseCommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" | "c" | "chord" | "f" | "flag" => {
                let row = parse_axis(tokens.next(), "row")?;
                let col = parse_axis(tokens.next(), "column")?;
                let target = row.zip(col);
                match name.as_bytes()[0].to_ascii_lowercase() {
                    b'r' => Self::Reveal(target),
                    b'c' => Self::Chord(target),
                    _ => Self::Flag(target),
                }
            }
            "n" | "new" => Self::Restart,
            "d" | "difficulty" => {
                let difficulty = tokens
                    .next()
                    .ok_or(ParseCommandError::MissingArgument("difficulty"))?;
                Self::SetDifficulty(difficulty.parse()?)
            }
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" => Self::Quit,
            _ => return Err(ParseCommandError::Unknown(name.into())),
        };

        match tokens.next() {
            Some(extra) => Err(ParseCommandError::TrailingInput(extra.into())),
            None => Ok(command),
        }
    }
}
