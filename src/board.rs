//! Board representation: cells, neighbors, groups and liberties.
//!
//! The board is a square grid stored row-major. Row 0 is the top edge and
//! column 0 the left edge. All accessors are bounds-checked, so a point
//! outside the grid (or a board whose cell vector was corrupted in storage)
//! reads as "not a point" rather than panicking.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point on the board as `(row, col)`.
pub type Point = (usize, usize);

/// A player, and the color of the stones they place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// Content of a single intersection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The owner of the stone on this cell, if any.
    pub fn stone(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }

    /// Symbol used by [`Board::serialize_position`].
    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'B',
            Cell::White => 'W',
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Supported board dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardSize {
    Nine,
    Thirteen,
    Nineteen,
}

impl BoardSize {
    /// Side length in intersections.
    pub fn dim(self) -> usize {
        match self {
            BoardSize::Nine => 9,
            BoardSize::Thirteen => 13,
            BoardSize::Nineteen => 19,
        }
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = BoardError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        match size {
            9 => Ok(BoardSize::Nine),
            13 => Ok(BoardSize::Thirteen),
            19 => Ok(BoardSize::Nineteen),
            other => Err(BoardError::UnsupportedSize(other)),
        }
    }
}

/// Errors raised while building a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unsupported board size {0}, expected 9, 13 or 19")]
    UnsupportedSize(usize),
    #[error("row {row} has {len} points, expected {size}")]
    RaggedRow { row: usize, len: usize, size: usize },
    #[error("unknown board symbol {0:?}")]
    UnknownSymbol(char),
}

/// Orthogonal neighbors of `(row, col)` that lie on a board of side `size`.
///
/// Corners have two neighbors, edges three, interior points four.
pub fn neighbors(row: usize, col: usize, size: usize) -> impl Iterator<Item = Point> {
    let mut v = Vec::with_capacity(4);
    if row >= size || col >= size {
        return v.into_iter();
    }
    if row > 0 {
        v.push((row - 1, col));
    }
    if row + 1 < size {
        v.push((row + 1, col));
    }
    if col > 0 {
        v.push((row, col - 1));
    }
    if col + 1 < size {
        v.push((row, col + 1));
    }
    v.into_iter()
}

/// A square Go board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: BoardSize) -> Self {
        let size = size.dim();
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build a board from a text diagram, one string per row.
    ///
    /// `.` is empty, `B`/`X` black and `W`/`O` white; whitespace is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let size = BoardSize::try_from(rows.len())?;
        let mut board = Board::new(size);
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != board.size {
                return Err(BoardError::RaggedRow {
                    row,
                    len: symbols.len(),
                    size: board.size,
                });
            }
            for (col, ch) in symbols.into_iter().enumerate() {
                let cell = match ch {
                    '.' | '+' => Cell::Empty,
                    'B' | 'X' | 'b' | 'x' => Cell::Black,
                    'W' | 'O' | 'w' | 'o' => Cell::White,
                    other => return Err(BoardError::UnknownSymbol(other)),
                };
                board.set((row, col), cell);
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// True if the size is supported and the cell storage matches it.
    ///
    /// Only a board restored from corrupted storage can fail this check.
    pub fn is_well_formed(&self) -> bool {
        BoardSize::try_from(self.size).is_ok() && self.cells.len() == self.size * self.size
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// The cell at `(row, col)`, or `None` off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if !self.contains(row, col) {
            return None;
        }
        let i = row.checked_mul(self.size)?.checked_add(col)?;
        self.cells.get(i).copied()
    }

    /// Whether `(row, col)` is an empty point on the board.
    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(Cell::Empty)
    }

    pub(crate) fn set(&mut self, (row, col): Point, cell: Cell) {
        if !self.contains(row, col) {
            return;
        }
        let i = self.idx(row, col);
        if let Some(slot) = self.cells.get_mut(i) {
            *slot = cell;
        }
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        (0..s).flat_map(move |row| (0..s).map(move |col| (row, col)))
    }

    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = Point> + use<> {
        neighbors(row, col, self.size)
    }

    /// The connected group of same-colored stones containing `(row, col)`.
    ///
    /// Empty points, points off the board and malformed boards yield an empty
    /// group. The fill uses an explicit stack, so 19x19 boards never recurse.
    pub fn group(&self, row: usize, col: usize) -> Vec<Point> {
        if !self.is_well_formed() {
            return Vec::new();
        }
        let Some(color) = self.get(row, col).filter(|c| *c != Cell::Empty) else {
            return Vec::new();
        };
        let mut stack = vec![(row, col)];
        let mut visited = vec![false; self.size * self.size];
        let mut out = Vec::new();
        while let Some((r, c)) = stack.pop() {
            let i = self.idx(r, c);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            if self.get(r, c) == Some(color) {
                out.push((r, c));
                for (nr, nc) in self.neighbors(r, c) {
                    if !visited[self.idx(nr, nc)] && self.get(nr, nc) == Some(color) {
                        stack.push((nr, nc));
                    }
                }
            }
        }
        out
    }

    /// Number of distinct empty points adjacent to any stone of `group`.
    pub fn liberties(&self, group: &[Point]) -> usize {
        if !self.is_well_formed() {
            return 0;
        }
        let mut seen = vec![false; self.size * self.size];
        let mut libs = 0;
        for &(r, c) in group {
            for (nr, nc) in self.neighbors(r, c) {
                let i = self.idx(nr, nc);
                if !seen[i] && self.is_empty_at(nr, nc) {
                    seen[i] = true;
                    libs += 1;
                }
            }
        }
        libs
    }

    /// The single liberty of `group`, if it has exactly one.
    pub fn sole_liberty(&self, group: &[Point]) -> Option<Point> {
        let mut found = None;
        for &(r, c) in group {
            for (nr, nc) in self.neighbors(r, c) {
                if !self.is_empty_at(nr, nc) {
                    continue;
                }
                match found {
                    None => found = Some((nr, nc)),
                    Some(p) if p == (nr, nc) => {}
                    Some(_) => return None,
                }
            }
        }
        found
    }

    /// Liberty count of the group containing `(row, col)`; 0 for empty points.
    pub fn group_liberties(&self, row: usize, col: usize) -> usize {
        self.liberties(&self.group(row, col))
    }

    pub(crate) fn remove(&mut self, group: &[Point]) {
        for &p in group {
            self.set(p, Cell::Empty);
        }
    }

    /// Canonical one-symbol-per-cell encoding used for exact position comparison.
    pub fn serialize_position(&self) -> String {
        self.cells.iter().map(|c| c.symbol()).collect()
    }

    /// Number of stones of `player` on the board.
    pub fn stone_count(&self, player: Player) -> usize {
        let cell = Cell::from(player);
        self.cells.iter().filter(|c| **c == cell).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let ch = match self.get(row, col) {
                    Some(Cell::Black) => 'X',
                    Some(Cell::White) => 'O',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_corner_edge_center() {
        assert_eq!(neighbors(0, 0, 9).count(), 2);
        assert_eq!(neighbors(0, 4, 9).count(), 3);
        assert_eq!(neighbors(4, 4, 9).count(), 4);
        assert_eq!(neighbors(8, 8, 9).count(), 2);
        assert_eq!(neighbors(9, 0, 9).count(), 0);
    }

    #[test]
    fn test_board_size_parsing() {
        assert_eq!(BoardSize::try_from(13), Ok(BoardSize::Thirteen));
        assert_eq!(BoardSize::try_from(10), Err(BoardError::UnsupportedSize(10)));
    }

    #[test]
    fn test_get_out_of_range() {
        let board = Board::new(BoardSize::Nine);
        assert_eq!(board.get(0, 0), Some(Cell::Empty));
        assert_eq!(board.get(9, 0), None);
        assert_eq!(board.get(0, usize::MAX), None);
    }

    #[test]
    fn test_group_and_liberties() {
        let board = Board::from_rows(&[
            "BB.......",
            "B........",
            ".........",
            "....W....",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ])
        .unwrap();
        let group = board.group(0, 0);
        assert_eq!(group.len(), 3);
        // (0,2), (1,1), (2,0)
        assert_eq!(board.liberties(&group), 3);
        assert_eq!(board.group_liberties(3, 4), 4);
        assert!(board.group(5, 5).is_empty());
        assert_eq!(board.group_liberties(5, 5), 0);
    }

    #[test]
    fn test_large_group_is_iterative() {
        let mut board = Board::new(BoardSize::Nineteen);
        for p in board.points().collect::<Vec<_>>() {
            if p != (18, 18) {
                board.set(p, Cell::Black);
            }
        }
        assert_eq!(board.group(0, 0).len(), 19 * 19 - 1);
        assert_eq!(board.group_liberties(0, 0), 1);
        assert_eq!(board.sole_liberty(&board.group(0, 0)), Some((18, 18)));
    }

    #[test]
    fn test_serialize_position() {
        let mut board = Board::new(BoardSize::Nine);
        board.set((0, 1), Cell::Black);
        board.set((0, 2), Cell::White);
        let key = board.serialize_position();
        assert_eq!(key.len(), 81);
        assert!(key.starts_with(".BW."));
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert_eq!(
            Board::from_rows(&["..", ".."]),
            Err(BoardError::UnsupportedSize(2))
        );
        let mut rows = vec!["........."; 9];
        rows[3] = "........";
        assert!(matches!(
            Board::from_rows(&rows),
            Err(BoardError::RaggedRow { row: 3, .. })
        ));
        rows[3] = "....?....";
        assert_eq!(Board::from_rows(&rows), Err(BoardError::UnknownSymbol('?')));
    }

    #[test]
    fn test_malformed_board_does_not_panic() {
        let board: Board = serde_json::from_str(r#"{"size":9,"cells":["Black"]}"#).unwrap();
        assert!(!board.is_well_formed());
        assert_eq!(board.get(4, 4), None);
        assert!(board.group(4, 4).is_empty());
    }

    #[test]
    fn test_oversized_board_does_not_overflow() {
        let board: Board =
            serde_json::from_str(r#"{"size":4294967296,"cells":["Empty"]}"#).unwrap();
        assert!(!board.is_well_formed());
        assert!(board.group(0, 0).is_empty());
        assert_eq!(board.liberties(&[(0, 0)]), 0);
        assert_eq!(board.group_liberties(0, 0), 0);

        let board: Board =
            serde_json::from_str(r#"{"size":18446744073709551615,"cells":[]}"#).unwrap();
        assert_eq!(board.get(2, 0), None);
        assert!(!board.is_empty_at(2, 0));
    }
}
