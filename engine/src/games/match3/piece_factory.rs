use super::board::Board;
use super::types::{Color, Piece, Position, SpecialKind, PALETTE};
use crate::games::session_rng::SessionRng;

/// Colour for `(row, col)` that does not finish a run of three with the two
/// cells to the left or the two cells above. Falls back to the whole palette
/// when every colour is excluded.
pub fn next_color(
    board: &Board,
    row: usize,
    col: usize,
    palette: &[Color],
    rng: &mut SessionRng,
) -> Color {
    let left_pair = if col >= 2 {
        shared_color(board.color_at(row, col - 1), board.color_at(row, col - 2))
    } else {
        None
    };
    let above_pair = if row >= 2 {
        shared_color(board.color_at(row - 1, col), board.color_at(row - 2, col))
    } else {
        None
    };

    let candidates: Vec<Color> = palette
        .iter()
        .copied()
        .filter(|color| Some(*color) != left_pair && Some(*color) != above_pair)
        .collect();

    rng.pick(&candidates)
        .or_else(|| rng.pick(palette))
        .copied()
        .unwrap_or(PALETTE[0])
}

fn shared_color(first: Option<Color>, second: Option<Color>) -> Option<Color> {
    match (first, second) {
        (Some(a), Some(b)) if a == b => Some(a),
        _ => None,
    }
}

/// Fills a `size`×`size` board row by row, left to right.
pub fn generate(size: usize, palette: &[Color], rng: &mut SessionRng) -> Board {
    let mut board = Board::empty(size);
    for row in 0..size {
        for col in 0..size {
            let color = next_color(&board, row, col, palette, rng);
            board.place(Position::new(row, col), color, SpecialKind::None);
        }
    }
    board
}

/// Board over the full palette; a missing seed draws one at random.
pub fn new_board(size: usize, rng_seed: Option<u64>) -> Board {
    let mut rng = SessionRng::from_optional_seed(rng_seed);
    generate(size, &PALETTE, &mut rng)
}

/// Spawns pieces into every empty cell, column by column from the left and
/// top-down within a column, so each spawn sees the spawns above it.
pub fn refill(board: &mut Board, palette: &[Color], rng: &mut SessionRng) -> Vec<Piece> {
    let size = board.size();
    let mut spawned = Vec::new();

    for col in 0..size {
        for row in 0..size {
            let pos = Position::new(row, col);
            if board.get(pos).is_some() {
                continue;
            }
            let color = next_color(board, row, col, palette, rng);
            spawned.push(board.place(pos, color, SpecialKind::None));
        }
    }

    spawned
}
