//! Weiqi: a Go rules engine with a heuristic computer opponent.
//!
//! The engine is a pure value-transformation library: every rules operation
//! takes a [`state::GameState`] and returns a new one, leaving the input
//! untouched. Only [`session::GameSession`] holds mutable state.
//!
//! ## Modules
//!
//! - [`constants`] - Komi and AI tuning parameters
//! - [`board`] - Grid, groups, liberties and position encoding
//! - [`state`] - Immutable game snapshots
//! - [`rules`] - Legality (suicide, positional superko), moves, passes, resignation
//! - [`scoring`] - Capture-plus-komi scoring
//! - [`ai`] - Priority-cascade move selection
//! - [`notation`] - `A1`-style coordinate labels
//! - [`session`] - Current game, undo, and stale AI reply protection
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use weiqi::ai::{AiMove, select_move};
//! use weiqi::board::BoardSize;
//! use weiqi::rules::{apply_move, is_legal};
//! use weiqi::state::create_initial_state;
//!
//! let state = create_initial_state(BoardSize::Nine);
//! assert!(is_legal(&state, 4, 4));
//! let state = apply_move(&state, 4, 4);
//!
//! let mut rng = fastrand::Rng::with_seed(1);
//! if let AiMove::Place((row, col)) = select_move(&state, &mut rng) {
//!     assert!(is_legal(&state, row, col));
//! }
//! ```

pub mod ai;
pub mod board;
pub mod constants;
pub mod gtp;
pub mod notation;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod state;
