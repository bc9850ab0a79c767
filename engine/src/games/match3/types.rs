pub const DEFAULT_BOARD_SIZE: usize = 8;
pub const MIN_BOARD_SIZE: usize = 4;
pub const MAX_BOARD_SIZE: usize = 16;
pub const MIN_PALETTE_SIZE: usize = 3;
pub const MIN_RUN_LENGTH: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

pub const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Purple,
    Color::Orange,
];

impl Color {
    pub fn symbol(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
            Color::Orange => 'O',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        PALETTE
            .iter()
            .copied()
            .find(|color| color.symbol() == symbol.to_ascii_uppercase())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SpecialKind {
    #[default]
    None,
    RowClear,
    ColumnClear,
    AreaBurst,
    ColorClear,
}

impl SpecialKind {
    pub fn is_special(self) -> bool {
        self != SpecialKind::None
    }

    pub fn is_line(self) -> bool {
        matches!(self, SpecialKind::RowClear | SpecialKind::ColumnClear)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct PieceId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub special: SpecialKind,
    pub position: Position,
}

impl Piece {
    pub fn is_special(&self) -> bool {
        self.special.is_special()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A maximal run of one colour. `line` is the row for horizontal runs and the
/// column for vertical ones; `start..=end` indexes along the run's axis.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Match {
    pub color: Color,
    pub axis: Axis,
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn position_at(&self, offset: usize) -> Position {
        match self.axis {
            Axis::Horizontal => Position::new(self.line, self.start + offset),
            Axis::Vertical => Position::new(self.start + offset, self.line),
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.len()).map(|offset| self.position_at(offset))
    }

    pub fn contains(&self, pos: Position) -> bool {
        match self.axis {
            Axis::Horizontal => pos.row == self.line && (self.start..=self.end).contains(&pos.col),
            Axis::Vertical => pos.col == self.line && (self.start..=self.end).contains(&pos.row),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpecialCreationRequest {
    pub position: Position,
    pub kind: SpecialKind,
    pub color: Color,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ComboEffect {
    BoardClear,
    ColorLines,
    ColorBursts,
    CrossLines,
    WideBand,
    DoubleBurst,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RejectReason {
    NotAdjacent,
    NoMatch,
    Busy,
    NotSpecial,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PieceMove {
    pub id: PieceId,
    pub from: Position,
    pub to: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResolutionEvent {
    Rejected {
        reason: RejectReason,
    },
    Matched {
        pieces: Vec<Piece>,
    },
    SpecialCreated {
        position: Position,
        kind: SpecialKind,
    },
    SpecialActivated {
        position: Position,
        kind: SpecialKind,
        affected: Vec<Position>,
    },
    Combo {
        first: Position,
        second: Position,
        effect: ComboEffect,
        affected: Vec<Position>,
    },
    Dropped {
        moves: Vec<PieceMove>,
    },
    Refilled {
        pieces: Vec<Piece>,
    },
    BoardSettled {
        cascades: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_manhattan_one() {
        let origin = Position::new(3, 3);
        assert!(origin.is_adjacent(Position::new(2, 3)));
        assert!(origin.is_adjacent(Position::new(3, 4)));
        assert!(!origin.is_adjacent(Position::new(4, 4)));
        assert!(!origin.is_adjacent(origin));
        assert!(!origin.is_adjacent(Position::new(3, 5)));
    }

    #[test]
    fn test_match_positions_follow_axis() {
        let horizontal = Match {
            color: Color::Red,
            axis: Axis::Horizontal,
            line: 2,
            start: 1,
            end: 3,
        };
        let positions: Vec<Position> = horizontal.positions().collect();
        assert_eq!(
            positions,
            vec![Position::new(2, 1), Position::new(2, 2), Position::new(2, 3)]
        );

        let vertical = Match {
            axis: Axis::Vertical,
            ..horizontal
        };
        assert_eq!(vertical.position_at(0), Position::new(1, 2));
        assert!(vertical.contains(Position::new(3, 2)));
        assert!(!vertical.contains(Position::new(2, 3)));
    }

    #[test]
    fn test_color_symbols_round_trip() {
        for color in PALETTE {
            assert_eq!(Color::from_symbol(color.symbol()), Some(color));
        }
        assert_eq!(Color::from_symbol('x'), None);
    }
}
