use std::fmt::Write as _;
use sweeper_core::{Cell, Coord2, GameState, Snapshot};

/// `mm:ss`
pub(crate) fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

const fn state_label(state: GameState) -> &'static str {
    use GameState::*;
    match state {
        Waiting => "reveal a cell to start",
        Playing => "playing",
        Won => "cleared!",
        Lost => "boom",
    }
}

fn glyph(coords: Coord2, cell: Cell, triggered: Option<Coord2>) -> char {
    if triggered == Some(coords) {
        return 'X';
    }
    match (cell.is_revealed(), cell.is_flagged(), cell.has_mine()) {
        (_, true, _) => 'F',
        (true, false, true) => '*',
        (true, false, false) => match cell.adjacent_mines() {
            0 => '.',
            n => char::from(b'0' + n),
        },
        (false, false, _) => '#',
    }
}

pub(crate) fn render(snapshot: &Snapshot<'_>) -> String {
    let board = snapshot.board;
    let mut out = String::new();

    let best = snapshot
        .best_time
        .map_or_else(|| "--:--".to_string(), format_time);
    let _ = writeln!(
        out,
        "{}  mines: {:03}  time: {}  best: {}  [{}]",
        snapshot.difficulty,
        snapshot.mines_remaining,
        format_time(snapshot.elapsed_secs),
        best,
        state_label(snapshot.state)
    );

    out.push_str("   ");
    for col in 0..board.cols() {
        let _ = write!(out, "{col:>3}");
    }
    out.push('\n');

    for row in 0..board.rows() {
        let _ = write!(out, "{row:>3}");
        for col in 0..board.cols() {
            let coords = (row, col);
            let _ = write!(
                out,
                "{:>3}",
                glyph(coords, board[coords], snapshot.triggered_mine)
            );
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{Board, Difficulty, Game, MemoryStore};

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn waiting_board_is_all_hidden() {
        let game = Game::new(Difficulty::Beginner, MemoryStore::new(), 0);
        let text = render(&game.snapshot());
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].starts_with("beginner  mines: 010  time: 00:00  best: --:--"));
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[2], "  0  #  #  #  #  #  #  #  #  #");
    }

    #[test]
    fn shows_numbers_flags_and_triggered_mine() {
        let board = Board::from_mine_coords((2, 3), &[(0, 0), (1, 2)]).unwrap();
        let mut game = Game::from_board(Difficulty::Beginner, board, MemoryStore::new(), 0);
        game.primary_click((0, 1));
        game.secondary_click((0, 0));
        game.primary_click((1, 2));

        let text = render(&game.snapshot());
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].ends_with("[boom]"));
        assert_eq!(lines[1], "     0  1  2");
        assert_eq!(lines[2], "  0  F  2  #");
        assert_eq!(lines[3], "  1  #  #  X");
    }
}
