use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Waiting -> Playing, on the first reveal inside the board
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> Waiting, on restart or difficulty change
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No mines placed yet
    #[default]
    Waiting,
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_waiting(self) -> bool {
        matches!(self, Self::Waiting)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Won or lost, no more moves are accepted
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Read-only view of a game handed to renderers.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub state: GameState,
    pub difficulty: Difficulty,
    pub mines_remaining: CellCount,
    pub elapsed_secs: u32,
    pub best_time: Option<u32>,
    pub triggered_mine: Option<Coord2>,
}

/// Owns one board at a time and is the only thing that mutates it.
#[derive(Clone, Debug)]
pub struct Game<S> {
    difficulty: Difficulty,
    config: GameConfig,
    board: Board,
    state: GameState,
    flag_count: CellCount,
    elapsed_secs: u32,
    triggered_mine: Option<Coord2>,
    seeds: SmallRng,
    best_times: BestTimeStore<S>,
}

impl<S: KeyValueStore> Game<S> {
    /// A waiting game; `seed` determines every board generated during this session.
    pub fn new(difficulty: Difficulty, store: S, seed: u64) -> Self {
        let config = difficulty.config();
        Self {
            difficulty,
            config,
            board: Board::new(config.size),
            state: GameState::Waiting,
            flag_count: 0,
            elapsed_secs: 0,
            triggered_mine: None,
            seeds: SmallRng::seed_from_u64(seed),
            best_times: BestTimeStore::load(store),
        }
    }

    /// Starts playing on a prepared minefield. Wins are still recorded under `difficulty`; a restart
    /// goes back to that difficulty's regular board.
    pub fn from_board(difficulty: Difficulty, board: Board, store: S, seed: u64) -> Self {
        let mut game = Self::new(difficulty, store, seed);
        game.config = board.game_config();
        game.flag_count = board.flagged_count();
        game.board = board;
        game.state = GameState::Playing;
        game
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn mines_remaining(&self) -> CellCount {
        self.config.mines.saturating_sub(self.flag_count)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn best_time(&self) -> Option<u32> {
        self.best_times.best(self.difficulty)
    }

    pub fn best_times(&self) -> &BestTimeStore<S> {
        &self.best_times
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            state: self.state,
            difficulty: self.difficulty,
            mines_remaining: self.mines_remaining(),
            elapsed_secs: self.elapsed_secs,
            best_time: self.best_time(),
            triggered_mine: self.triggered_mine,
        }
    }

    /// Reveal. The first one inside the board places the mines around it.
    pub fn primary_click(&mut self, coords: Coord2) -> RevealOutcome {
        match self.state {
            GameState::Waiting => {
                if !self.board.contains(coords) || !self.seed_board(coords) {
                    return RevealOutcome::NoOp;
                }
            }
            GameState::Playing => {}
            GameState::Won | GameState::Lost => return RevealOutcome::NoOp,
        }

        let outcome = self.board.reveal(coords);
        if outcome == RevealOutcome::MineHit {
            self.triggered_mine = Some(coords);
        }
        self.settle(outcome)
    }

    /// Flag toggle. Unflagging always works, flagging stops once every mine has a flag.
    pub fn secondary_click(&mut self, coords: Coord2) -> MarkOutcome {
        if !self.state.is_playing() {
            return MarkOutcome::NoChange;
        }
        let Some(cell) = self.board.get(coords) else {
            return MarkOutcome::NoChange;
        };
        if cell.is_revealed() {
            return MarkOutcome::NoChange;
        }

        if cell.is_flagged() {
            self.board.set_flag(coords, false);
            self.flag_count -= 1;
        } else if self.mines_remaining() > 0 {
            self.board.set_flag(coords, true);
            self.flag_count += 1;
        } else {
            log::debug!("No flags left for {:?}", coords);
            return MarkOutcome::NoChange;
        }
        log::debug!("Flag toggled at {:?}, mines remaining: {}", coords, self.mines_remaining());
        MarkOutcome::Changed
    }

    pub fn chord_click(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.state.is_playing() {
            return RevealOutcome::NoOp;
        }

        let outcome = self.board.chord_reveal(coords);
        if outcome == RevealOutcome::MineHit {
            self.triggered_mine = self
                .board
                .iter_neighbors(coords)
                .find(|&pos| self.board[pos].has_mine() && !self.board[pos].is_flagged());
        }
        self.settle(outcome)
    }

    /// One second of host time; only counts while playing.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    pub fn restart(&mut self) {
        self.reset(self.difficulty);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.reset(difficulty);
    }

    /// Swaps in a blank board for `difficulty` and clears every per-game counter in one step.
    fn reset(&mut self, difficulty: Difficulty) {
        let config = difficulty.config();
        self.difficulty = difficulty;
        self.config = config;
        self.board = Board::new(config.size);
        self.state = GameState::Waiting;
        self.flag_count = 0;
        self.elapsed_secs = 0;
        self.triggered_mine = None;
        log::debug!("New {} game", difficulty);
    }

    fn seed_board(&mut self, safe_cell: Coord2) -> bool {
        let seed: u64 = self.seeds.random();
        match ShuffleGenerator::new(seed, safe_cell).generate(self.config) {
            Ok(board) => {
                self.board = board;
                self.state = GameState::Playing;
                true
            }
            Err(err) => {
                log::error!("Could not generate {:?}: {}", self.config, err);
                false
            }
        }
    }

    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        match outcome {
            RevealOutcome::MineHit => {
                log::debug!("Lost after {}s", self.elapsed_secs);
                self.state = GameState::Lost;
            }
            RevealOutcome::Cleared => self.check_win(),
            RevealOutcome::NoOp => {}
        }
        outcome
    }

    fn check_win(&mut self) {
        if !self.state.is_playing() || self.board.unrevealed_count() != self.config.mines {
            return;
        }

        self.state = GameState::Won;
        self.board.flag_all_mines();
        self.flag_count = self.config.mines;
        log::debug!("Won after {}s", self.elapsed_secs);
        self.best_times.offer(self.difficulty, self.elapsed_secs);
    }
}
