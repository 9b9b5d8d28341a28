//! Heuristic computer opponent.
//!
//! Moves are chosen by a priority cascade; the first tier that finds a move
//! wins:
//!
//! 1. capture opponent stones
//! 2. rescue one of our groups in atari
//! 3. put an opponent group into atari
//! 4. best heuristic score (captures, shape, center, opening points, jitter)
//!
//! All tiers scan the board row-major, so ties go to the earliest point.
//! The only nondeterminism is the jitter, drawn from the caller's
//! [`fastrand::Rng`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::board::{Cell, Point};
use crate::constants::{
    OPENING_MOVES, SCORE_JITTER, SCORE_PER_CAPTURE, SCORE_PER_FRIENDLY_NEIGHBOR, SCORE_SELF_ATARI,
    SCORE_STAR_POINT, SCORE_THIRD_LINE, THIRD_LINE,
};
use crate::rules::{Placement, preview};
use crate::state::GameState;

/// The opponent's decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMove {
    Place(Point),
    Pass,
}

/// Why move selection could not run normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiFault {
    #[error("game is already over")]
    Terminated,
    #[error("malformed state: {0}")]
    MalformedState(String),
    #[error("move selection panicked: {0}")]
    Panicked(String),
}

/// A legal move together with its resolved board.
struct Candidate {
    point: Point,
    placement: Placement,
}

impl Candidate {
    /// Liberties of the mover's group after the move.
    fn own_liberties(&self) -> usize {
        self.placement
            .board
            .group_liberties(self.point.0, self.point.1)
    }
}

/// Choose a move for the player to move. Faults degrade to a pass.
///
/// Faults are reported through `tracing`; use [`try_select_move`] to observe
/// them directly.
pub fn select_move(state: &GameState, rng: &mut fastrand::Rng) -> AiMove {
    match try_select_move(state, rng) {
        Ok(mv) => mv,
        Err(fault) => {
            warn!(%fault, "move selection failed, passing");
            AiMove::Pass
        }
    }
}

/// Choose a move for the player to move, reporting faults to the caller.
pub fn try_select_move(state: &GameState, rng: &mut fastrand::Rng) -> Result<AiMove, AiFault> {
    if state.terminated {
        return Err(AiFault::Terminated);
    }
    if !state.board.is_well_formed() {
        let size = state.board.size();
        return Err(AiFault::MalformedState(format!(
            "{size}x{size} board with inconsistent cell storage"
        )));
    }
    panic::catch_unwind(AssertUnwindSafe(|| choose(state, rng)))
        .map_err(|payload| AiFault::Panicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Every legal move for the player to move, in row-major order.
fn candidates(state: &GameState) -> Vec<Candidate> {
    state
        .board
        .points()
        .filter_map(|(r, c)| {
            preview(state, r, c).ok().map(|placement| Candidate {
                point: (r, c),
                placement,
            })
        })
        .collect()
}

fn choose(state: &GameState, rng: &mut fastrand::Rng) -> AiMove {
    let candidates = candidates(state);

    if candidates.is_empty() {
        debug!(player = %state.current_player, "no legal moves");
        return AiMove::Pass;
    }

    if let Some(c) = candidates.iter().find(|c| c.placement.captured > 0) {
        debug!(point = ?c.point, captured = c.placement.captured, "capture");
        return AiMove::Place(c.point);
    }

    if let Some(pt) = rescue(state, &candidates) {
        debug!(point = ?pt, "rescue from atari");
        return AiMove::Place(pt);
    }

    if let Some(pt) = attack(state, &candidates) {
        debug!(point = ?pt, "atari");
        return AiMove::Place(pt);
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, c) in candidates.iter().enumerate() {
        let s = heuristic_score(state, c, rng);
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    let idx = match best {
        Some((i, s)) => {
            debug!(point = ?candidates[i].point, score = s, "heuristic");
            i
        }
        None => rng.usize(..candidates.len()),
    };
    AiMove::Place(candidates[idx].point)
}

/// First of our groups in atari whose liberty can be filled to reach two or more liberties.
fn rescue(state: &GameState, candidates: &[Candidate]) -> Option<Point> {
    let board = &state.board;
    let own = Cell::from(state.current_player);
    let size = board.size();
    let mut visited = vec![false; size * size];

    for (r, c) in board.points() {
        if visited[r * size + c] || board.get(r, c) != Some(own) {
            continue;
        }
        let group = board.group(r, c);
        for &(gr, gc) in &group {
            visited[gr * size + gc] = true;
        }
        let Some(lib) = board.sole_liberty(&group) else {
            continue;
        };
        let saved = candidates
            .iter()
            .find(|cand| cand.point == lib)
            .is_some_and(|cand| cand.own_liberties() > 1);
        if saved {
            return Some(lib);
        }
    }
    None
}

/// First safe move that leaves an adjacent opponent group with exactly one liberty.
fn attack(state: &GameState, candidates: &[Candidate]) -> Option<Point> {
    let opp = Cell::from(state.current_player.opponent());
    candidates
        .iter()
        .find(|cand| {
            if cand.own_liberties() <= 1 {
                return false;
            }
            let (row, col) = cand.point;
            state.board.neighbors(row, col).any(|(nr, nc)| {
                state.board.get(nr, nc) == Some(opp)
                    && state.board.group_liberties(nr, nc) >= 2
                    && cand.placement.board.group_liberties(nr, nc) == 1
            })
        })
        .map(|cand| cand.point)
}

fn heuristic_score(state: &GameState, cand: &Candidate, rng: &mut fastrand::Rng) -> f64 {
    let (row, col) = cand.point;
    let size = state.size();
    let own = Cell::from(state.current_player);

    let mut s = SCORE_PER_CAPTURE * f64::from(cand.placement.captured);
    if cand.own_liberties() <= 1 {
        s += SCORE_SELF_ATARI;
    }

    let friendly = state
        .board
        .neighbors(row, col)
        .filter(|&(r, c)| state.board.get(r, c) == Some(own))
        .count();
    s += SCORE_PER_FRIENDLY_NEIGHBOR * friendly as f64;

    let center = size / 2;
    let dist = row.abs_diff(center) + col.abs_diff(center);
    s += size.saturating_sub(dist) as f64;

    if state.move_count < OPENING_MOVES {
        if is_star_point(row, col, size) {
            s += SCORE_STAR_POINT;
        }
        if edge_distance(row, col, size) == THIRD_LINE {
            s += SCORE_THIRD_LINE;
        }
    }

    s + rng.f64() * SCORE_JITTER
}

/// Distance (0-indexed) to the nearest edge.
fn edge_distance(row: usize, col: usize, size: usize) -> usize {
    row.min(col)
        .min(size.saturating_sub(1 + row))
        .min(size.saturating_sub(1 + col))
}

pub fn is_star_point(row: usize, col: usize, size: usize) -> bool {
    let lines: &[usize] = match size {
        9 => &[2, 6],
        13 => &[3, 6, 9],
        19 => &[3, 9, 15],
        _ => &[],
    };
    (size == 9 && row == 4 && col == 4) || (lines.contains(&row) && lines.contains(&col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Player};

    fn setpos(top_rows: &[&str], to_move: Player) -> GameState {
        let mut rows: Vec<&str> = top_rows.to_vec();
        rows.resize(9, ".........");
        GameState::from_board(Board::from_rows(&rows).unwrap(), to_move)
    }

    fn candidate(state: &GameState, point: Point) -> Candidate {
        candidates(state)
            .into_iter()
            .find(|c| c.point == point)
            .unwrap()
    }

    #[test]
    fn test_rescue_skips_extension_still_in_atari() {
        // Extending to (1,0) leaves the pair with only (2,0).
        let state = setpos(&["BW.......", ".W......."], Player::Black);
        let cands = candidates(&state);
        assert_eq!(candidate(&state, (1, 0)).own_liberties(), 1);
        assert_eq!(rescue(&state, &cands), None);
    }

    #[test]
    fn test_attack_skips_self_atari() {
        // (0,0) would also put White in atari, but the Black stone there has one liberty.
        let state = setpos(&[".W.......", ".B......."], Player::Black);
        let cands = candidates(&state);
        assert_eq!(candidate(&state, (0, 0)).own_liberties(), 1);
        assert_eq!(attack(&state, &cands), Some((0, 2)));
    }

    #[test]
    fn test_heuristic_score_components() {
        let mut state = setpos(&[".W.......", ".B......."], Player::Black);
        state.move_count = OPENING_MOVES;
        // (0,0): self-atari -50, center 9 - 8.
        // (1,2): one friendly neighbor +20, center 9 - 5.
        // (4,4): center 9 - 0.
        for (point, base) in [((0, 0), -49.0), ((1, 2), 24.0), ((4, 4), 9.0)] {
            let cand = candidate(&state, point);
            for seed in 0..10 {
                let s = heuristic_score(&state, &cand, &mut fastrand::Rng::with_seed(seed));
                assert!(s >= base && s < base + SCORE_JITTER, "{point:?} scored {s}");
            }
        }

        // Opening: star point +30, third line +15, center 9 - 4.
        state.move_count = 0;
        let cand = candidate(&state, (2, 2));
        let s = heuristic_score(&state, &cand, &mut fastrand::Rng::with_seed(7));
        assert!((50.0..50.0 + SCORE_JITTER).contains(&s), "(2, 2) scored {s}");
    }

    #[test]
    fn test_star_points() {
        assert!(is_star_point(2, 2, 9));
        assert!(is_star_point(4, 4, 9));
        assert!(!is_star_point(2, 4, 9));
        assert!(is_star_point(6, 6, 13));
        assert!(is_star_point(3, 15, 19));
        assert!(!is_star_point(4, 4, 19));
    }

    #[test]
    fn test_edge_distance() {
        assert_eq!(edge_distance(0, 5, 9), 0);
        assert_eq!(edge_distance(2, 5, 9), 2);
        assert_eq!(edge_distance(6, 4, 9), 2);
        assert_eq!(edge_distance(4, 4, 9), 4);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
