use std::fmt;

use crate::board::{Board, Cell, Side};
use crate::types::Position;

/// Compass order N, NE, E, SE, S, SW, W, NW.
///
/// Move generation walks this order and the AI's first-seen tie-break
/// depends on it; do not reorder.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];
const STEPS: [i32; 2] = [1, 2];

/// A candidate move. Distance 1 is a clone move, distance 2 a jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: Position,
    pub destination: Position,
}

impl Move {
    pub fn new(source: Position, destination: Position) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Chebyshev distance between source and destination.
    pub fn step(&self) -> u8 {
        self.source.chebyshev(self.destination)
    }

    pub fn is_jump(&self) -> bool {
        self.step() == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Returns whether `side` may play `mv` on `board`. Never fails: anything
/// malformed, including off-board coordinates, is simply illegal.
pub fn is_legal(board: &Board, mv: Move, side: Side) -> bool {
    let (source, destination) = (mv.source, mv.destination);
    if !board.contains(source) || !board.contains(destination) {
        return false;
    }
    if board.cell(source) != Cell::Piece(side) || board.cell(destination) != Cell::Empty {
        return false;
    }

    let d_row = (i32::from(destination.row) - i32::from(source.row)).abs();
    let d_col = (i32::from(destination.col) - i32::from(source.col)).abs();
    let step = d_row.max(d_col);
    if !(1..=2).contains(&step) {
        return false;
    }

    (d_row == 0 || d_row == step) && (d_col == 0 || d_col == step)
}

/// Enumerates every legal move for `side`: sources row-major, then step 1
/// before step 2, then `DIRECTIONS` order. Empty means `side` must pass.
pub fn generate_moves(board: &Board, side: Side) -> Vec<Move> {
    sources(board, side)
        .flat_map(|source| legal_from(board, source, side))
        .collect()
}

/// Legal moves starting at `source`, in generation order.
pub fn moves_from(board: &Board, source: Position, side: Side) -> Vec<Move> {
    if !board.contains(source) {
        return Vec::new();
    }
    legal_from(board, source, side).collect()
}

pub fn has_legal_move(board: &Board, side: Side) -> bool {
    sources(board, side).any(|source| legal_from(board, source, side).next().is_some())
}

fn sources(board: &Board, side: Side) -> impl Iterator<Item = Position> + '_ {
    let size = board.size();
    (0..size)
        .flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
        .filter(move |&pos| board.cell(pos) == Cell::Piece(side))
}

fn legal_from(board: &Board, source: Position, side: Side) -> impl Iterator<Item = Move> + '_ {
    STEPS
        .into_iter()
        .flat_map(|step| DIRECTIONS.into_iter().map(move |(dr, dc)| (dr * step, dc * step)))
        .filter_map(move |(dr, dc)| {
            let row = i32::from(source.row) + dr;
            let col = i32::from(source.col) + dc;
            board
                .in_bounds(row, col)
                .then(|| Move::new(source, Position::new(row as u8, col as u8)))
        })
        .filter(move |&mv| is_legal(board, mv, side))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn single_step_and_jump_in_all_shapes_are_legal() {
        let board = Board::from_rows(&["....", ".R..", "....", "...."]).unwrap();

        assert!(is_legal(&board, Move::new(pos(1, 1), pos(0, 1)), Side::Red));
        assert!(is_legal(&board, Move::new(pos(1, 1), pos(2, 2)), Side::Red));
        assert!(is_legal(&board, Move::new(pos(1, 1), pos(3, 1)), Side::Red));
        assert!(is_legal(&board, Move::new(pos(1, 1), pos(3, 3)), Side::Red));
        assert!(is_legal(&board, Move::new(pos(1, 1), pos(1, 3)), Side::Red));
    }

    #[test]
    fn knight_shapes_distance_three_and_null_moves_are_illegal() {
        let board = Board::from_rows(&[".....", ".R...", ".....", ".....", "....."]).unwrap();

        assert!(!is_legal(&board, Move::new(pos(1, 1), pos(3, 2)), Side::Red));
        assert!(!is_legal(&board, Move::new(pos(1, 1), pos(4, 1)), Side::Red));
        assert!(!is_legal(&board, Move::new(pos(1, 1), pos(1, 1)), Side::Red));
    }

    #[test]
    fn wrong_owner_occupied_target_and_off_board_are_illegal() {
        let board = Board::from_rows(&["RB..", "....", "....", "...."]).unwrap();

        assert!(!is_legal(&board, Move::new(pos(0, 0), pos(1, 0)), Side::Blue));
        assert!(!is_legal(&board, Move::new(pos(0, 0), pos(0, 1)), Side::Red));
        assert!(!is_legal(&board, Move::new(pos(1, 0), pos(2, 0)), Side::Red));
        assert!(!is_legal(&board, Move::new(pos(0, 0), pos(0, 4)), Side::Red));
        assert!(!is_legal(&board, Move::new(pos(9, 9), pos(8, 8)), Side::Red));
    }

    #[test]
    fn corner_piece_generates_moves_in_step_then_compass_order() {
        let board = Board::new();

        let moves = moves_from(&board, pos(0, 0), Side::Red);
        let targets: Vec<Position> = moves.iter().map(|m| m.destination).collect();

        // step 1: E, SE, S; step 2: E, SE, S
        assert_eq!(
            targets,
            vec![pos(0, 1), pos(1, 1), pos(1, 0), pos(0, 2), pos(2, 2), pos(2, 0)]
        );
        assert!(!moves[0].is_jump());
        assert!(moves[3].is_jump());
    }

    #[test]
    fn generation_walks_sources_row_major() {
        let board = Board::new();

        let moves = generate_moves(&board, Side::Red);

        assert_eq!(moves.len(), 12);
        assert!(moves[..6].iter().all(|m| m.source == pos(0, 0)));
        assert!(moves[6..].iter().all(|m| m.source == pos(7, 7)));
        assert_eq!(moves[6].destination, pos(6, 7));
    }

    #[test]
    fn generated_moves_are_all_legal() {
        let board = Board::from_rows(&[
            "RB.B.R..",
            ".BRB..B.",
            "B..R.B..",
            ".R.B..R.",
            "..B..R.B",
            "R...B...",
            ".B.R..B.",
            "B..R...R",
        ])
        .unwrap();

        for side in [Side::Red, Side::Blue] {
            let moves = generate_moves(&board, side);
            assert!(!moves.is_empty());
            assert!(moves.iter().all(|&m| is_legal(&board, m, side)));
            assert!(has_legal_move(&board, side));
        }
    }

    #[test]
    fn boxed_in_side_has_no_moves() {
        let board = Board::from_rows(&["RBBB", "BBBB", "BBB.", "...."]).unwrap();

        assert!(generate_moves(&board, Side::Red).is_empty());
        assert!(!has_legal_move(&board, Side::Red));
        assert!(has_legal_move(&board, Side::Blue));
    }
}
