use std::io::{self, BufRead, Write};
use sweeper_core::{Game, KeyValueStore};
use web_time::Instant;

use crate::clock::Clock;
use crate::command::{Command, HELP, ParseCommandError};
use crate::render::render;

/// Drives one game from line-based input: every command first catches the timer up, then becomes a
/// click on the engine.
pub(crate) struct Session<S> {
    game: Game<S>,
    clock: Clock,
}

impl<S: KeyValueStore> Session<S> {
    pub(crate) fn new(game: Game<S>) -> Self {
        Self {
            game,
            clock: Clock::new(Instant::now()),
        }
    }

    pub(crate) fn game(&self) -> &Game<S> {
        &self.game
    }

    pub(crate) fn run(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        writeln!(output, "{}", render(&self.game.snapshot()))?;

        for line in input.lines() {
            let line = line?;
            let now = Instant::now();
            self.catch_up(now);

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => {
                    writeln!(output, "{HELP}")?;
                    continue;
                }
                Ok(command) => self.apply(command, now),
                Err(ParseCommandError::Empty) => {}
                Err(err) => {
                    writeln!(output, "{err}")?;
                    continue;
                }
            }
            writeln!(output, "{}", render(&self.game.snapshot()))?;
        }

        output.flush()
    }

    /// Feeds the engine the seconds that passed since the last command.
    fn catch_up(&mut self, now: Instant) {
        let ticks = self.clock.take_ticks(now);
        if !self.game.state().is_playing() {
            return;
        }
        for _ in 0..ticks {
            self.game.tick();
        }
    }

    fn apply(&mut self, command: Command, now: Instant) {
        let was_playing = self.game.state().is_playing();

        match command {
            Command::Reveal(Some(coords)) => {
                // clicking a revealed number chords it
                let revealed = self
                    .game
                    .board()
                    .get(coords)
                    .is_some_and(|cell| cell.is_revealed());
                if revealed {
                    self.game.chord_click(coords);
                } else {
                    self.game.primary_click(coords);
                }
            }
            Command::Flag(Some(coords)) => {
                self.game.secondary_click(coords);
            }
            Command::Chord(Some(coords)) => {
                self.game.chord_click(coords);
            }
            Command::Reveal(None) | Command::Flag(None) | Command::Chord(None) => {
                log::debug!("Ignoring click outside the board");
            }
            Command::Restart => self.game.restart(),
            Command::SetDifficulty(difficulty) => self.game.set_difficulty(difficulty),
            Command::Help | Command::Quit => {}
        }

        if !was_playing && self.game.state().is_playing() {
            self.clock.reset(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{Board, Difficulty, GameState, MemoryStore};

    fn run(session: &mut Session<MemoryStore>, input: &str) -> String {
        let mut output = Vec::new();
        session.run(input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn prepared() -> Session<MemoryStore> {
        let board = Board::from_mine_coords((3, 3), &[(0, 1), (2, 1)]).unwrap();
        Session::new(Game::from_board(
            Difficulty::Beginner,
            board,
            MemoryStore::new(),
            0,
        ))
    }

    #[test]
    fn first_reveal_starts_game() {
        let mut session = Session::new(Game::new(Difficulty::Beginner, MemoryStore::new(), 4));

        let output = run(&mut session, "r 4 4\n");

        assert_ne!(session.game().state(), GameState::Waiting);
        assert!(output.contains("[reveal a cell to start]"));
    }

    #[test]
    fn reveal_on_number_chords() {
        let mut session = prepared();

        run(&mut session, "r 1 1\nf 0 1\nf 2 1\nr 1 1\n");

        assert_eq!(session.game().state(), GameState::Won);
        assert!(session.game().best_time().is_some());
    }

    #[test]
    fn explicit_chord_and_flags() {
        let mut session = prepared();

        let output = run(&mut session, "r 1 1\nf 0 1\nf 1 0\nc 1 1\n");

        assert_eq!(session.game().state(), GameState::Lost);
        assert!(output.contains("[boom]"));
    }

    #[test]
    fn quit_stops_reading() {
        let mut session = prepared();

        run(&mut session, "q\nr 0 1\n");

        assert_eq!(session.game().state(), GameState::Playing);
    }

    #[test]
    fn bad_lines_print_errors_and_keep_going() {
        let mut session = prepared();

        let output = run(&mut session, "jump\nr -3 0\nh\nd expert\n");

        assert!(output.contains("unknown command \"jump\""));
        assert!(output.contains("commands:"));
        assert_eq!(session.game().difficulty(), Difficulty::Expert);
        assert_eq!(session.game().state(), GameState::Waiting);
    }
}
