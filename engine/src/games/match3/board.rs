use super::types::{Color, Piece, PieceId, PieceMove, Position, SpecialKind};

/// Square, row-major grid. Cells are only empty between the clearing and
/// refilling phases of a resolution cycle.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Piece>>,
    next_id: u64,
}

impl Board {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            next_id: 1,
        }
    }

    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::empty(rows.len());
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.chars().count(), rows.len(), "row {} is not square", row);
            for (col, symbol) in line.chars().enumerate() {
                if symbol == '.' {
                    continue;
                }
                let color = Color::from_symbol(symbol)
                    .unwrap_or_else(|| panic!("unknown colour symbol {:?}", symbol));
                board.place(Position::new(row, col), color, SpecialKind::None);
            }
        }
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn check_position(&self, pos: Position) -> Result<(), String> {
        if !self.contains(pos) {
            return Err(format!(
                "Position ({}, {}) is outside the {}x{} board",
                pos.row, pos.col, self.size, self.size
            ));
        }
        Ok(())
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    pub fn get(&self, pos: Position) -> Option<&Piece> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[self.index(pos)].as_ref()
    }

    pub fn color_at(&self, row: usize, col: usize) -> Option<Color> {
        self.get(Position::new(row, col)).map(|piece| piece.color)
    }

    /// Puts a freshly identified piece into `pos`, replacing any occupant.
    pub fn place(&mut self, pos: Position, color: Color, special: SpecialKind) -> Piece {
        let piece = Piece {
            id: PieceId(self.next_id),
            color,
            special,
            position: pos,
        };
        self.next_id += 1;
        let index = self.index(pos);
        self.cells[index] = Some(piece);
        piece
    }

    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        if !self.contains(pos) {
            return None;
        }
        let index = self.index(pos);
        self.cells[index].take()
    }

    /// Upgrades the occupant in place; the piece keeps its id.
    pub fn set_special(&mut self, pos: Position, kind: SpecialKind) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let index = self.index(pos);
        match self.cells[index].as_mut() {
            Some(piece) => {
                piece.special = kind;
                true
            }
            None => false,
        }
    }

    pub fn swap(&mut self, a: Position, b: Position) {
        let (ia, ib) = (self.index(a), self.index(b));
        self.cells.swap(ia, ib);
        if let Some(piece) = self.cells[ia].as_mut() {
            piece.position = a;
        }
        if let Some(piece) = self.cells[ib].as_mut() {
            piece.position = b;
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size;
        (0..size * size).map(move |index| Position::new(index / size, index % size))
    }

    /// Drops every piece to the lowest free cell of its column, keeping
    /// relative order, and reports each piece that moved.
    pub fn collapse_columns(&mut self) -> Vec<PieceMove> {
        let mut moves = Vec::new();

        for col in 0..self.size {
            let mut target = self.size;
            for row in (0..self.size).rev() {
                let from = Position::new(row, col);
                let Some(mut piece) = self.take(from) else {
                    continue;
                };
                target -= 1;
                let to = Position::new(target, col);
                piece.position = to;
                if to != from {
                    moves.push(PieceMove {
                        id: piece.id,
                        from,
                        to,
                    });
                }
                let index = self.index(to);
                self.cells[index] = Some(piece);
            }
        }

        moves
    }

    /// Text form used by the CLI: colour symbol plus a special marker per cell.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size * 3 + 1));
        for row in 0..self.size {
            for col in 0..self.size {
                match self.get(Position::new(row, col)) {
                    Some(piece) => {
                        out.push(piece.color.symbol());
                        out.push(special_marker(piece.special));
                    }
                    None => out.push_str(". "),
                }
                if col + 1 < self.size {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }
}

fn special_marker(kind: SpecialKind) -> char {
    match kind {
        SpecialKind::None => ' ',
        SpecialKind::RowClear => '-',
        SpecialKind::ColumnClear => '|',
        SpecialKind::AreaBurst => '+',
        SpecialKind::ColorClear => '*',
    }
}

/// Position set with set semantics over one board, iterated in row-major order.
#[derive(Clone, Debug)]
pub struct CellSet {
    size: usize,
    marked: Vec<bool>,
    count: usize,
}

impl CellSet {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            marked: vec![false; size * size],
            count: 0,
        }
    }

    pub fn insert(&mut self, pos: Position) -> bool {
        if pos.row >= self.size || pos.col >= self.size {
            return false;
        }
        let slot = &mut self.marked[pos.row * self.size + pos.col];
        if *slot {
            return false;
        }
        *slot = true;
        self.count += 1;
        true
    }

    pub fn remove(&mut self, pos: Position) -> bool {
        if !self.contains(pos) {
            return false;
        }
        self.marked[pos.row * self.size + pos.col] = false;
        self.count -= 1;
        true
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size && self.marked[pos.row * self.size + pos.col]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn to_positions(&self) -> Vec<Position> {
        self.marked
            .iter()
            .enumerate()
            .filter(|(_, marked)| **marked)
            .map(|(index, _)| Position::new(index / self.size, index % self.size))
            .collect()
    }
}

impl Extend<Position> for CellSet {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        for pos in iter {
            self.insert(pos);
        }
    }
}
