use super::board::{Board, CellSet};
use super::types::{Color, ComboEffect, Piece, Position, SpecialKind};

#[derive(Clone, Debug, PartialEq)]
pub struct Combination {
    pub effect: ComboEffect,
    pub cleared: Vec<Position>,
}

/// Cells cleared when `piece` is triggered on its own. Plain pieces clear nothing.
pub fn activate(piece: &Piece, board: &Board) -> Vec<Position> {
    let mut cells = CellSet::new(board.size());
    match piece.special {
        SpecialKind::None => {}
        SpecialKind::RowClear => add_row(&mut cells, board.size(), piece.position.row),
        SpecialKind::ColumnClear => add_column(&mut cells, board.size(), piece.position.col),
        SpecialKind::AreaBurst => add_square(&mut cells, board.size(), piece.position, 1),
        SpecialKind::ColorClear => cells.extend(positions_of_color(board, piece.color)),
    }
    cells.to_positions()
}

/// Effect of swapping two special pieces into each other. The effect kind does
/// not depend on argument order; `first` only anchors the line+line cross.
pub fn combine(first: &Piece, second: &Piece, board: &Board) -> Option<Combination> {
    let effect = combo_effect(first.special, second.special)?;
    let size = board.size();
    let mut cells = CellSet::new(size);

    match effect {
        ComboEffect::BoardClear => cells.extend(board.positions()),
        ComboEffect::ColorLines => {
            let line = if first.special.is_line() { first } else { second };
            for pos in positions_of_color(board, line.color) {
                match line.special {
                    SpecialKind::RowClear => add_row(&mut cells, size, pos.row),
                    _ => add_column(&mut cells, size, pos.col),
                }
            }
        }
        ComboEffect::ColorBursts => {
            let burst = if first.special == SpecialKind::AreaBurst { first } else { second };
            for pos in positions_of_color(board, burst.color) {
                add_square(&mut cells, size, pos, 1);
            }
        }
        ComboEffect::CrossLines => {
            add_row(&mut cells, size, first.position.row);
            add_column(&mut cells, size, first.position.col);
        }
        ComboEffect::WideBand => {
            let (line, burst) = if first.special.is_line() {
                (first, second)
            } else {
                (second, first)
            };
            let center = burst.position;
            match line.special {
                SpecialKind::RowClear => {
                    for row in center.row.saturating_sub(1)..=(center.row + 1).min(size - 1) {
                        add_row(&mut cells, size, row);
                    }
                }
                _ => {
                    for col in center.col.saturating_sub(1)..=(center.col + 1).min(size - 1) {
                        add_column(&mut cells, size, col);
                    }
                }
            }
        }
        ComboEffect::DoubleBurst => {
            for piece in [first, second] {
                add_square(&mut cells, size, piece.position, 1);
                add_square(&mut cells, size, piece.position, 2);
            }
        }
    }

    Some(Combination {
        effect,
        cleared: cells.to_positions(),
    })
}

pub fn combo_effect(a: SpecialKind, b: SpecialKind) -> Option<ComboEffect> {
    use SpecialKind::{AreaBurst, ColorClear};

    let effect = match (a, b) {
        (ColorClear, ColorClear) => ComboEffect::BoardClear,
        (ColorClear, other) | (other, ColorClear) if other.is_line() => ComboEffect::ColorLines,
        (ColorClear, AreaBurst) | (AreaBurst, ColorClear) => ComboEffect::ColorBursts,
        (x, y) if x.is_line() && y.is_line() => ComboEffect::CrossLines,
        (line, AreaBurst) | (AreaBurst, line) if line.is_line() => ComboEffect::WideBand,
        (AreaBurst, AreaBurst) => ComboEffect::DoubleBurst,
        _ => return None,
    };
    Some(effect)
}

fn positions_of_color(board: &Board, color: Color) -> Vec<Position> {
    board
        .pieces()
        .filter(|piece| piece.color == color)
        .map(|piece| piece.position)
        .collect()
}

fn add_row(cells: &mut CellSet, size: usize, row: usize) {
    cells.extend((0..size).map(|col| Position::new(row, col)));
}

fn add_column(cells: &mut CellSet, size: usize, col: usize) {
    cells.extend((0..size).map(|row| Position::new(row, col)));
}

/// Square of side `2 * radius + 1` centred on `center`, clipped to the board.
fn add_square(cells: &mut CellSet, size: usize, center: Position, radius: usize) {
    if size == 0 {
        return;
    }
    let rows = center.row.saturating_sub(radius)..=(center.row + radius).min(size - 1);
    for row in rows {
        let cols = center.col.saturating_sub(radius)..=(center.col + radius).min(size - 1);
        for col in cols {
            cells.insert(Position::new(row, col));
        }
    }
}
