use super::board::{Board, CellSet};
use super::types::{
    Axis, Color, Match, Position, SpecialCreationRequest, SpecialKind, MIN_RUN_LENGTH,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchScan {
    pub matches: Vec<Match>,
    pub creations: Vec<SpecialCreationRequest>,
}

impl MatchScan {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Every matched cell once, however many runs it belongs to.
    pub fn cleared_positions(&self, board_size: usize) -> CellSet {
        let mut cleared = CellSet::new(board_size);
        for run in &self.matches {
            cleared.extend(run.positions());
        }
        cleared
    }
}

/// Scans all rows, then all columns, for maximal same-colour runs of at least
/// three occupied cells.
pub fn find_matches(board: &Board) -> MatchScan {
    let mut scan = MatchScan::default();
    for row in 0..board.size() {
        scan_line(board, Axis::Horizontal, row, &mut scan);
    }
    for col in 0..board.size() {
        scan_line(board, Axis::Vertical, col, &mut scan);
    }
    scan
}

fn scan_line(board: &Board, axis: Axis, line: usize, scan: &mut MatchScan) {
    let size = board.size();
    if size == 0 {
        return;
    }

    let color_at = |index: usize| match axis {
        Axis::Horizontal => board.color_at(line, index),
        Axis::Vertical => board.color_at(index, line),
    };

    let mut run_start = 0;
    let mut run_color = color_at(0);

    for index in 1..size {
        let color = color_at(index);
        if color.is_some() && color == run_color {
            continue;
        }
        flush_run(axis, line, run_start, index - 1, run_color, scan);
        run_start = index;
        run_color = color;
    }

    flush_run(axis, line, run_start, size - 1, run_color, scan);
}

fn flush_run(
    axis: Axis,
    line: usize,
    start: usize,
    end: usize,
    color: Option<Color>,
    scan: &mut MatchScan,
) {
    let Some(color) = color else {
        return;
    };
    if end + 1 - start < MIN_RUN_LENGTH {
        return;
    }

    let run = Match {
        color,
        axis,
        line,
        start,
        end,
    };
    if let Some(request) = creation_for_run(&run) {
        scan.creations.push(request);
    }
    scan.matches.push(run);
}

/// Four in a line makes a line-clear on the second cell; five or more makes a
/// colour-clear on the third cell.
pub fn creation_for_run(run: &Match) -> Option<SpecialCreationRequest> {
    let (offset, kind) = match run.len() {
        4 => match run.axis {
            Axis::Horizontal => (1, SpecialKind::RowClear),
            Axis::Vertical => (1, SpecialKind::ColumnClear),
        },
        len if len >= 5 => (2, SpecialKind::ColorClear),
        _ => return None,
    };

    Some(SpecialCreationRequest {
        position: run.position_at(offset),
        kind,
        color: run.color,
    })
}

/// Area-burst requests where a horizontal and a vertical run of exactly three
/// of the same colour share a cell not already claimed by another request.
pub fn find_cross_creations(scan: &MatchScan) -> Vec<SpecialCreationRequest> {
    let mut requests: Vec<SpecialCreationRequest> = Vec::new();
    let is_claimed = |requests: &[SpecialCreationRequest], pos: Position| {
        scan.creations.iter().chain(requests.iter()).any(|r| r.position == pos)
    };

    let threes = |axis: Axis| {
        scan.matches
            .iter()
            .filter(move |run| run.axis == axis && run.len() == MIN_RUN_LENGTH)
    };

    for horizontal in threes(Axis::Horizontal) {
        for vertical in threes(Axis::Vertical) {
            if horizontal.color != vertical.color {
                continue;
            }
            let shared = Position::new(horizontal.line, vertical.line);
            if !horizontal.contains(shared) || !vertical.contains(shared) {
                continue;
            }
            if is_claimed(&requests, shared) {
                continue;
            }
            requests.push(SpecialCreationRequest {
                position: shared,
                kind: SpecialKind::AreaBurst,
                color: horizontal.color,
            });
        }
    }

    requests
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_match(scan: &MatchScan) -> Match {
        assert_eq!(scan.matches.len(), 1, "{:?}", scan.matches);
        scan.matches[0]
    }

    #[test]
    fn test_run_of_three_makes_match_without_creation() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RRRBGYPO",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        let run = single_match(&scan);
        assert_eq!(run.axis, Axis::Horizontal);
        assert_eq!((run.line, run.start, run.end), (3, 0, 2));
        assert_eq!(run.color, Color::Red);
        assert!(scan.creations.is_empty());
        assert_eq!(scan.cleared_positions(8).len(), 3);
    }

    #[test]
    fn test_run_of_four_flushed_on_mismatch() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
            "BYYYYOPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        let run = single_match(&scan);
        assert_eq!((run.line, run.start, run.end), (5, 1, 4));
        assert_eq!(
            scan.creations,
            vec![SpecialCreationRequest {
                position: Position::new(5, 2),
                kind: SpecialKind::RowClear,
                color: Color::Yellow,
            }]
        );
    }

    #[test]
    fn test_run_of_four_flushed_at_end_of_row() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYOOOO",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        let run = single_match(&scan);
        assert_eq!((run.line, run.start, run.end), (0, 4, 7));
        assert_eq!(scan.creations.len(), 1);
        assert_eq!(scan.creations[0].position, Position::new(0, 5));
        assert_eq!(scan.creations[0].kind, SpecialKind::RowClear);
    }

    #[test]
    fn test_run_of_five_creates_color_clear_on_third_cell() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBBBBBOP",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        assert_eq!(single_match(&scan).len(), 5);
        assert_eq!(
            scan.creations,
            vec![SpecialCreationRequest {
                position: Position::new(6, 3),
                kind: SpecialKind::ColorClear,
                color: Color::Blue,
            }]
        );
    }

    #[test]
    fn test_run_of_six_uses_same_anchor_rule() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GOOOOOOY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        assert_eq!(single_match(&scan).len(), 6);
        assert_eq!(scan.creations[0].position, Position::new(1, 3));
        assert_eq!(scan.creations[0].kind, SpecialKind::ColorClear);
    }

    #[test]
    fn test_vertical_run_of_four_flushed_at_bottom_edge() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYRORBGY",
            "PORBGYPO",
            "RBRYPORB",
            "GYRORBGY",
        ]);

        let scan = find_matches(&board);

        let run = single_match(&scan);
        assert_eq!(run.axis, Axis::Vertical);
        assert_eq!((run.line, run.start, run.end), (2, 4, 7));
        assert_eq!(scan.creations[0].position, Position::new(5, 2));
        assert_eq!(scan.creations[0].kind, SpecialKind::ColumnClear);
    }

    #[test]
    fn test_vertical_run_of_four_flushed_on_mismatch() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGG",
            "PORBGYPG",
            "RBGYPORG",
            "GYPORBGG",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        let run = single_match(&scan);
        assert_eq!((run.line, run.start, run.end), (7, 1, 4));
        assert_eq!(scan.creations[0].position, Position::new(2, 7));
        assert_eq!(scan.creations[0].kind, SpecialKind::ColumnClear);
    }

    #[test]
    fn test_vertical_run_of_five() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORPGY",
            "PORBGPPO",
            "RBGYPPRB",
            "GYPORPGY",
            "PORBGPPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        assert_eq!(single_match(&scan).len(), 5);
        assert_eq!(scan.creations[0].position, Position::new(3, 5));
        assert_eq!(scan.creations[0].kind, SpecialKind::ColorClear);
    }

    #[test]
    fn test_crossing_runs_share_a_cell_once() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "YYYBGYPO",
            "YBGYPORB",
            "YYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let scan = find_matches(&board);

        assert_eq!(scan.matches.len(), 2);
        assert_eq!(scan.matches[0].axis, Axis::Horizontal);
        assert_eq!(scan.matches[1].axis, Axis::Vertical);
        let cleared = scan.cleared_positions(8);
        assert_eq!(cleared.len(), 5);
        assert!(cleared.contains(Position::new(2, 0)));
        assert!(scan.creations.is_empty());
    }

    #[test]
    fn test_empty_cells_break_runs() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RR.R",
            "....",
            "....",
            "BGB.",
        ]);

        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_empty_cells_never_match_each_other() {
        assert!(find_matches(&Board::empty(5)).is_empty());
    }

    #[test]
    fn test_cross_creation_for_l_shape() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "YYYBGYPO",
            "YBGYPORB",
            "YYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
        ]);

        let requests = find_cross_creations(&find_matches(&board));

        assert_eq!(
            requests,
            vec![SpecialCreationRequest {
                position: Position::new(2, 0),
                kind: SpecialKind::AreaBurst,
                color: Color::Yellow,
            }]
        );
    }

    #[test]
    fn test_cross_creation_for_t_shape() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPBBBGY",
            "PORBBYPO",
            "RBGYBORB",
            "GYPORBGY",
        ]);

        let requests = find_cross_creations(&find_matches(&board));

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].position, Position::new(4, 4));
    }

    #[test]
    fn test_no_cross_creation_for_parallel_runs() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            "RRRYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPORBGY",
            "PORBGYPO",
            "RBGYPORB",
            "GYPOOOGY",
        ]);

        let scan = find_matches(&board);

        assert_eq!(scan.matches.len(), 2);
        assert!(find_cross_creations(&scan).is_empty());
    }
}
