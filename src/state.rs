//! Immutable game snapshots.
//!
//! A [`GameState`] is never mutated by the rules engine: every operation in
//! [`crate::rules`] returns a fresh value, so callers can keep earlier states
//! around for undo, replay or comparison.

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardSize, Player, Point};

/// Per-color tally of captured opponent stones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn of(&self, player: Player) -> u32 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub(crate) fn add(&mut self, player: Player, stones: u32) {
        match player {
            Player::Black => self.black += stones,
            Player::White => self.white += stones,
        }
    }
}

/// Outcome of a finished game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Black,
    White,
    Draw,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Winner::Black,
            Player::White => Winner::White,
        }
    }
}

/// One entry of the move log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: Player,
    /// Placement point; `None` for a pass.
    pub point: Option<Point>,
    pub captured: u32,
    pub is_pass: bool,
}

/// A complete game snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub captures: Captures,
    /// Serialized boards, one per stone placement. Used for superko.
    pub history: Vec<String>,
    pub move_log: Vec<MoveRecord>,
    pub pass_streak: u32,
    pub terminated: bool,
    pub winner: Option<Winner>,
    pub last_move: Option<Point>,
    /// Stones placed so far; passes are not counted.
    pub move_count: u32,
}

impl GameState {
    /// Build a state from an arbitrary position with `to_move` on turn.
    ///
    /// The setup position is recorded in `history`, so no later move may
    /// recreate it.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let history = vec![board.serialize_position()];
        Self {
            board,
            current_player: to_move,
            captures: Captures::default(),
            history,
            move_log: Vec::new(),
            pass_streak: 0,
            terminated: false,
            winner: None,
            last_move: None,
            move_count: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Whether this exact board position has already occurred.
    pub fn seen(&self, position: &str) -> bool {
        self.history.iter().any(|h| h == position)
    }
}

/// A fresh game on an empty board with Black to move.
pub fn create_initial_state(size: BoardSize) -> GameState {
    GameState {
        board: Board::new(size),
        current_player: Player::Black,
        captures: Captures::default(),
        history: Vec::new(),
        move_log: Vec::new(),
        pass_streak: 0,
        terminated: false,
        winner: None,
        last_move: None,
        move_count: 0,
    }
}
