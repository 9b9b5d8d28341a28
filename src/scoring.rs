//! End-of-game scoring.
//!
//! Scores are capture counts plus komi for White. Territory and stones on
//! the board are not counted.

use serde::{Deserialize, Serialize};

use crate::constants::KOMI;
use crate::state::{GameState, Winner};

/// Final score of a game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub black: f64,
    pub white: f64,
    pub winner: Winner,
}

impl Score {
    /// Result in the usual `B+3.5` / `W+4.5` / `0` notation.
    pub fn result_string(&self) -> String {
        let margin = (self.black - self.white).abs();
        match self.winner {
            Winner::Black => format!("B+{margin}"),
            Winner::White => format!("W+{margin}"),
            Winner::Draw => "0".to_string(),
        }
    }
}

pub fn score(state: &GameState) -> Score {
    let black = f64::from(state.captures.black);
    let white = f64::from(state.captures.white) + KOMI;
    let winner = if black > white {
        Winner::Black
    } else if black < white {
        Winner::White
    } else {
        Winner::Draw
    };
    Score {
        black,
        white,
        winner,
    }
}
