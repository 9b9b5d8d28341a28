//! Constants for scoring and the heuristic opponent.
//!
//! Board geometry is a runtime property of each game (see [`crate::board::BoardSize`]),
//! so only rule and tuning parameters live here.

// =============================================================================
// Rules
// =============================================================================

/// Compensation awarded to White for moving second.
pub const KOMI: f64 = 6.5;

/// Number of consecutive passes that ends the game.
pub const PASS_LIMIT: u32 = 2;

// =============================================================================
// Session
// =============================================================================

/// Most states a session keeps for undo; older ones are dropped.
pub const UNDO_LIMIT: usize = 64;

// =============================================================================
// Heuristic Weights (AI move scoring)
// =============================================================================

/// Bonus per opponent stone captured by a move.
pub const SCORE_PER_CAPTURE: f64 = 100.0;

/// Penalty for a move that leaves the mover's own group with at most one liberty.
pub const SCORE_SELF_ATARI: f64 = -50.0;

/// Bonus per orthogonal neighbor already holding one of the mover's stones.
pub const SCORE_PER_FRIENDLY_NEIGHBOR: f64 = 20.0;

/// Opening bonus for star points.
pub const SCORE_STAR_POINT: f64 = 30.0;

/// Opening bonus for points on the third line.
pub const SCORE_THIRD_LINE: f64 = 15.0;

/// Upper bound (exclusive) of the uniform random jitter added to each score.
pub const SCORE_JITTER: f64 = 10.0;

/// Opening bonuses apply while fewer than this many stones have been played.
pub const OPENING_MOVES: u32 = 10;

/// Distance from the edge (0-indexed) of the third line.
pub const THIRD_LINE: usize = 2;
