use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::rules::{DIRECTIONS, Move, is_legal};
use crate::types::Position;

pub const DEFAULT_BOARD_SIZE: u8 = 8;
pub const MIN_BOARD_SIZE: u8 = 4;
pub const MAX_BOARD_SIZE: u8 = 16;

/// One of the two competing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Wire code: 1=red, 2=blue.
    pub fn code(self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Blue => 2,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Blue => f.write_str("blue"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Piece(Side),
}

impl Cell {
    /// Wire code: 0=empty, 1=red, 2=blue.
    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Piece(side) => side.code(),
        }
    }

    fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Piece(Side::Red) => 'R',
            Self::Piece(Side::Blue) => 'B',
        }
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Self::Empty),
            'R' | 'r' => Some(Self::Piece(Side::Red)),
            'B' | 'b' => Some(Self::Piece(Side::Blue)),
            _ => None,
        }
    }
}

/// What a single `Board::apply` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Cells turned to the mover's side, all adjacent to the destination.
    pub flipped: Vec<Position>,
    pub is_jump: bool,
}

impl Placement {
    pub fn flipped_count(&self) -> usize {
        self.flipped.len()
    }
}

/// Square grid of cells, row-major.
///
/// Boards are plain values: the AI works on clones and never touches the
/// live game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates the initial 8x8 board.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_BOARD_SIZE)
    }

    /// Creates the initial board with the four corners seeded:
    /// top-left and bottom-right red, top-right and bottom-left blue.
    pub fn with_size(size: u8) -> Self {
        debug_assert!(size >= 2, "board needs distinct corners");
        let last = size - 1;
        let mut board = Self::empty(size);
        board.set(Position::new(0, 0), Cell::Piece(Side::Red));
        board.set(Position::new(last, last), Cell::Piece(Side::Red));
        board.set(Position::new(0, last), Cell::Piece(Side::Blue));
        board.set(Position::new(last, 0), Cell::Piece(Side::Blue));
        board
    }

    fn empty(size: u8) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; usize::from(size) * usize::from(size)],
        }
    }

    /// Parses a board from text rows using `R`, `B` and `.`; whitespace is
    /// ignored. The grid must be square.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GameError> {
        let size = rows.len();
        if size < 2 || size > usize::from(MAX_BOARD_SIZE) {
            return Err(GameError::InvalidBoard(format!(
                "expected 2..={MAX_BOARD_SIZE} rows, got {size}"
            )));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row_idx, row) in rows.iter().enumerate() {
            let before = cells.len();
            for glyph in row.chars().filter(|c| !c.is_whitespace()) {
                let cell = Cell::from_glyph(glyph).ok_or_else(|| {
                    GameError::InvalidBoard(format!("unknown cell {glyph:?} in row {row_idx}"))
                })?;
                cells.push(cell);
            }
            let width = cells.len() - before;
            if width != size {
                return Err(GameError::InvalidBoard(format!(
                    "row {row_idx} has {width} cells, expected {size}"
                )));
            }
        }

        Ok(Self {
            size: size as u8,
            cells,
        })
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns the cell at `pos`.
    ///
    /// Panics when `pos` is off the board; check with `contains` first.
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        let size = i32::from(self.size);
        (0..size).contains(&row) && (0..size).contains(&col)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|&&cell| cell == Cell::Piece(side))
            .count()
    }

    /// Returns `(red_count, blue_count)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.count(Side::Red), self.count(Side::Blue))
    }

    /// Piece differential from `side`'s point of view.
    pub fn differential(&self, side: Side) -> i32 {
        self.count(side) as i32 - self.count(side.opponent()) as i32
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == Cell::Empty).count()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Converts the board to wire codes, row-major.
    pub fn to_array(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.code()).collect()
    }

    /// Plays `mv` for `side`: a jump vacates its source, the destination takes
    /// `side`, and every opposing piece in the ring around the destination
    /// flips. Nothing further away changes.
    ///
    /// Caller contract: `mv` is legal for `side` on this board.
    pub fn apply(&mut self, mv: Move, side: Side) -> Placement {
        debug_assert!(is_legal(self, mv, side), "apply() called with illegal move {mv}");

        let is_jump = mv.is_jump();
        if is_jump {
            self.set(mv.source, Cell::Empty);
        }
        self.set(mv.destination, Cell::Piece(side));

        let opponent = Cell::Piece(side.opponent());
        let mut flipped = Vec::new();
        for (dr, dc) in DIRECTIONS {
            let row = i32::from(mv.destination.row) + dr;
            let col = i32::from(mv.destination.col) + dc;
            if !self.in_bounds(row, col) {
                continue;
            }
            let pos = Position::new(row as u8, col as u8);
            if self.cell(pos) == opponent {
                self.set(pos, Cell::Piece(side));
                flipped.push(pos);
            }
        }

        Placement { flipped, is_jump }
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    fn index(&self, pos: Position) -> usize {
        usize::from(pos.row) * usize::from(self.size) + usize::from(pos.col)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(usize::from(self.size)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
        }
        Ok(())
    }
}
