//! Human-readable coordinates such as `D4`.
//!
//! Columns use letters from `A` skipping `I`; rows are numbered from 1 at the
//! bottom edge, so row 0 (the top of the board) is numbered `size`.

use crate::board::Point;

/// Column letters in board order (no `I`).
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRST";

/// Label for `(row, col)` on a board of side `size`, or `None` off the board.
pub fn to_display_notation(row: usize, col: usize, size: usize) -> Option<String> {
    if row >= size || col >= size {
        return None;
    }
    let letter = *COLUMNS.get(col)? as char;
    Some(format!("{letter}{}", size - row))
}

/// Parse a label such as `d4` back into a point; case-insensitive.
pub fn parse_notation(text: &str, size: usize) -> Option<Point> {
    let text = text.trim();
    let mut chars = text.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let col = COLUMNS.iter().position(|&c| c as char == letter)?;
    let number: usize = chars.as_str().parse().ok()?;
    if number == 0 || number > size || col >= size {
        return None;
    }
    Some((size - number, col))
}
