//! Move legality and move application.
//!
//! Legality is checked in the order a stone is actually resolved on the
//! board: the stone is placed, adjacent opponent groups left without
//! liberties are removed, and only then is the mover's own group checked for
//! suicide. The resulting position must not appear anywhere in the game's
//! history (positional superko).

use thiserror::Error;
use tracing::debug;

use crate::board::{Board, Cell, Player, Point};
use crate::constants::PASS_LIMIT;
use crate::scoring::score;
use crate::state::{GameState, MoveRecord};

/// Why a placement is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("point ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("point not empty")]
    Occupied,
    #[error("suicide")]
    Suicide,
    #[error("recreates an earlier position")]
    Ko,
    #[error("game is over")]
    GameOver,
    #[error("board storage does not match its size")]
    MalformedBoard,
}

/// A stone placement resolved on a scratch board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Board after the stone is placed and captures are removed.
    pub board: Board,
    /// Opponent stones removed by the placement.
    pub captured: u32,
}

/// Place `player`'s stone at `pt` on a copy of `board` and remove captured groups.
///
/// No legality checks are made beyond the capture resolution itself.
fn place(board: &Board, player: Player, pt: Point) -> Placement {
    let mut board = board.clone();
    board.set(pt, Cell::from(player));

    let opp = Cell::from(player.opponent());
    let mut captured = 0u32;
    for (nr, nc) in board.neighbors(pt.0, pt.1) {
        // Already removed if it belonged to a group captured via another side.
        if board.get(nr, nc) != Some(opp) {
            continue;
        }
        let group = board.group(nr, nc);
        if board.liberties(&group) == 0 {
            captured += group.len() as u32;
            board.remove(&group);
        }
    }
    Placement { board, captured }
}

/// Resolve a placement for the player to move, or explain why it is illegal.
pub fn preview(state: &GameState, row: usize, col: usize) -> Result<Placement, MoveError> {
    if state.terminated {
        return Err(MoveError::GameOver);
    }
    if !state.board.is_well_formed() {
        return Err(MoveError::MalformedBoard);
    }
    match state.board.get(row, col) {
        None => return Err(MoveError::OutOfBounds { row, col }),
        Some(Cell::Empty) => {}
        Some(_) => return Err(MoveError::Occupied),
    }

    let placement = place(&state.board, state.current_player, (row, col));
    if placement.captured == 0 && placement.board.group_liberties(row, col) == 0 {
        return Err(MoveError::Suicide);
    }
    if state.seen(&placement.board.serialize_position()) {
        return Err(MoveError::Ko);
    }
    Ok(placement)
}

/// Check whether the player to move may place a stone at `(row, col)`.
pub fn check_move(state: &GameState, row: usize, col: usize) -> Result<(), MoveError> {
    preview(state, row, col).map(|_| ())
}

pub fn is_legal(state: &GameState, row: usize, col: usize) -> bool {
    check_move(state, row, col).is_ok()
}

/// All legal placements for the player to move, in row-major order.
pub fn legal_moves(state: &GameState) -> Vec<Point> {
    if !state.board.is_well_formed() {
        return Vec::new();
    }
    state
        .board
        .points()
        .filter(|&(r, c)| is_legal(state, r, c))
        .collect()
}

/// Play a stone for the player to move, returning the next state.
pub fn try_move(state: &GameState, row: usize, col: usize) -> Result<GameState, MoveError> {
    let placement = preview(state, row, col)?;
    let player = state.current_player;
    if placement.captured > 0 {
        debug!(%player, row, col, captured = placement.captured, "captured stones");
    }

    let mut next = state.clone();
    next.history.push(placement.board.serialize_position());
    next.board = placement.board;
    next.captures.add(player, placement.captured);
    next.move_log.push(MoveRecord {
        player,
        point: Some((row, col)),
        captured: placement.captured,
        is_pass: false,
    });
    next.current_player = player.opponent();
    next.pass_streak = 0;
    next.move_count += 1;
    next.last_move = Some((row, col));
    Ok(next)
}

/// Play a stone, or return the state unchanged if the move is illegal.
pub fn apply_move(state: &GameState, row: usize, col: usize) -> GameState {
    try_move(state, row, col).unwrap_or_else(|err| {
        debug!(row, col, %err, "ignored illegal move");
        state.clone()
    })
}

/// Pass the turn. The second consecutive pass ends and scores the game.
pub fn apply_pass(state: &GameState) -> GameState {
    let mut next = state.clone();
    if state.terminated {
        return next;
    }
    next.move_log.push(MoveRecord {
        player: state.current_player,
        point: None,
        captured: 0,
        is_pass: true,
    });
    next.pass_streak += 1;
    if next.pass_streak >= PASS_LIMIT {
        let result = score(&next);
        debug!(
            black = result.black,
            white = result.white,
            winner = ?result.winner,
            "game ended by consecutive passes"
        );
        next.terminated = true;
        next.winner = Some(result.winner);
    } else {
        next.current_player = state.current_player.opponent();
    }
    next
}

/// The player to move resigns; the opponent wins.
pub fn apply_resign(state: &GameState) -> GameState {
    let mut next = state.clone();
    if state.terminated {
        return next;
    }
    next.terminated = true;
    next.winner = Some(state.current_player.opponent().into());
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;
    use crate::state::{Winner, create_initial_state};

    #[test]
    fn test_first_move() {
        let state = create_initial_state(BoardSize::Nine);
        assert!(is_legal(&state, 4, 4));
        let next = apply_move(&state, 4, 4);
        assert_eq!(next.board.get(4, 4), Some(Cell::Black));
        assert_eq!(next.current_player, Player::White);
        assert_eq!(next.move_count, 1);
        assert_eq!(next.history.len(), 1);
        assert_eq!(next.last_move, Some((4, 4)));
    }

    #[test]
    fn test_occupied_and_out_of_bounds() {
        let state = apply_move(&create_initial_state(BoardSize::Nine), 4, 4);
        assert_eq!(check_move(&state, 4, 4), Err(MoveError::Occupied));
        assert_eq!(
            check_move(&state, 9, 0),
            Err(MoveError::OutOfBounds { row: 9, col: 0 })
        );
        assert_eq!(apply_move(&state, 0, 100), state);
    }

    #[test]
    fn test_pass_switches_player() {
        let state = create_initial_state(BoardSize::Nine);
        let next = apply_pass(&state);
        assert_eq!(next.pass_streak, 1);
        assert_eq!(next.current_player, Player::White);
        assert_eq!(next.move_count, 0);
        assert!(next.history.is_empty());
        assert!(next.move_log[0].is_pass);
    }

    #[test]
    fn test_move_resets_pass_streak() {
        let state = apply_pass(&create_initial_state(BoardSize::Nine));
        let next = apply_move(&state, 2, 2);
        assert_eq!(next.pass_streak, 0);
        assert!(!apply_pass(&next).terminated);
    }

    #[test]
    fn test_resign() {
        let state = create_initial_state(BoardSize::Nine);
        let next = apply_resign(&state);
        assert!(next.terminated);
        assert_eq!(next.winner, Some(Winner::White));
        assert_eq!(next.board, state.board);
        assert_eq!(check_move(&next, 0, 0), Err(MoveError::GameOver));
        assert_eq!(apply_pass(&next), next);
    }

    #[test]
    fn test_malformed_board_is_rejected() {
        let mut state = create_initial_state(BoardSize::Nine);
        state.board = serde_json::from_str(r#"{"size":4294967296,"cells":["Empty"]}"#).unwrap();
        assert_eq!(check_move(&state, 0, 0), Err(MoveError::MalformedBoard));
        assert_eq!(apply_move(&state, 0, 0), state);
        assert!(legal_moves(&state).is_empty());
    }

    #[test]
    fn test_legal_moves_on_empty_board() {
        let state = create_initial_state(BoardSize::Nine);
        let moves = legal_moves(&state);
        assert_eq!(moves.len(), 81);
        assert_eq!(moves[0], (0, 0));
        assert_eq!(moves[80], (8, 8));
    }
}
