use super::board::Board;
use super::match_detector::find_matches;
use super::special_effects::combo_effect;
use super::types::Position;

/// Whether the engine would accept swapping `a` and `b`: the swap forms a run,
/// or both cells hold specials that combine.
pub fn swap_is_accepted(board: &Board, a: Position, b: Position) -> bool {
    if !board.contains(a) || !board.contains(b) || !a.is_adjacent(b) {
        return false;
    }

    let combines = match (board.get(a), board.get(b)) {
        (Some(first), Some(second)) => combo_effect(first.special, second.special).is_some(),
        _ => false,
    };
    if combines {
        return true;
    }

    let mut scratch = board.clone();
    scratch.swap(a, b);
    !find_matches(&scratch).is_empty()
}

/// First accepted swap in row-major order, trying the right neighbour before
/// the one below.
pub fn find_valid_swap(board: &Board) -> Option<(Position, Position)> {
    let size = board.size();
    for pos in board.positions() {
        let right = Position::new(pos.row, pos.col + 1);
        if pos.col + 1 < size && swap_is_accepted(board, pos, right) {
            return Some((pos, right));
        }
        let below = Position::new(pos.row + 1, pos.col);
        if pos.row + 1 < size && swap_is_accepted(board, pos, below) {
            return Some((pos, below));
        }
    }
    None
}

pub fn find_activatable(board: &Board) -> Option<Position> {
    board
        .pieces()
        .find(|piece| piece.is_special())
        .map(|piece| piece.position)
}

/// A board has moves while some swap is accepted or a special can be triggered.
pub fn has_moves(board: &Board) -> bool {
    find_activatable(board).is_some() || find_valid_swap(board).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::match3::types::SpecialKind;

    #[rustfmt::skip]
    const STUCK: [&str; 4] = [
        "RBGY",
        "GYRB",
        "RBGY",
        "GYRB",
    ];

    #[test]
    fn test_finds_first_swap_in_row_major_order() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RRBRGYPO",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        // Dropping the red at (2, 2) into row 3 comes before the swap inside row 3.
        assert_eq!(
            find_valid_swap(&board),
            Some((Position::new(2, 2), Position::new(3, 2)))
        );
        assert!(swap_is_accepted(&board, Position::new(3, 2), Position::new(3, 3)));
        assert!(has_moves(&board));
    }

    #[test]
    fn test_stuck_board_has_no_moves() {
        let board = Board::from_rows(&STUCK);
        assert_eq!(find_valid_swap(&board), None);
        assert_eq!(find_activatable(&board), None);
        assert!(!has_moves(&board));
    }

    #[test]
    fn test_special_pair_counts_as_a_swap() {
        let mut board = Board::from_rows(&STUCK);
        board.set_special(Position::new(1, 1), SpecialKind::AreaBurst);
        board.set_special(Position::new(2, 1), SpecialKind::RowClear);

        assert!(swap_is_accepted(&board, Position::new(1, 1), Position::new(2, 1)));
        assert!(!swap_is_accepted(&board, Position::new(1, 1), Position::new(1, 2)));
        assert_eq!(
            find_valid_swap(&board),
            Some((Position::new(1, 1), Position::new(2, 1)))
        );
        assert_eq!(find_activatable(&board), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_lone_special_still_leaves_a_move() {
        let mut board = Board::from_rows(&STUCK);
        board.set_special(Position::new(3, 3), SpecialKind::ColorClear);
        assert_eq!(find_valid_swap(&board), None);
        assert!(has_moves(&board));
    }

    #[test]
    fn test_rejects_non_adjacent_and_outside_cells() {
        let board = Board::from_rows(&STUCK);
        assert!(!swap_is_accepted(&board, Position::new(0, 0), Position::new(2, 0)));
        assert!(!swap_is_accepted(&board, Position::new(3, 3), Position::new(3, 4)));
    }
}
