//! The imperative shell around the pure rules engine.
//!
//! A [`GameSession`] holds the current [`GameState`], the last
//! [`UNDO_LIMIT`] states it replaced (for undo) and a generation counter that
//! changes on every state change.
//! AI work is requested against a snapshot tagged with the generation, and a
//! reply is only committed if the session is still at that generation. A
//! reply computed for a position that has since been reset, undone or played
//! on is rejected as stale.

use std::collections::VecDeque;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::ai::{AiMove, select_move};
use crate::board::BoardSize;
use crate::constants::UNDO_LIMIT;
use crate::rules::{MoveError, apply_pass, apply_resign, try_move};
use crate::state::{GameState, create_initial_state};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("AI reply computed at generation {reply}, session is at {current}")]
    Stale { reply: u64, current: u64 },
    #[error("illegal move: {0}")]
    Illegal(#[from] MoveError),
}

/// A position handed to the AI, tagged with the session generation.
#[derive(Clone, Debug)]
pub struct AiRequest {
    pub generation: u64,
    pub state: GameState,
}

impl AiRequest {
    pub fn compute(&self, rng: &mut fastrand::Rng) -> AiReply {
        AiReply {
            generation: self.generation,
            mv: select_move(&self.state, rng),
        }
    }
}

/// The AI's answer to an [`AiRequest`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AiReply {
    pub generation: u64,
    pub mv: AiMove,
}

pub struct GameSession {
    state: GameState,
    undo: VecDeque<GameState>,
    generation: u64,
}

impl GameSession {
    pub fn new(size: BoardSize) -> Self {
        Self {
            state: create_initial_state(size),
            undo: VecDeque::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start over on an empty board. In-flight AI requests become stale.
    pub fn new_game(&mut self, size: BoardSize) {
        self.state = create_initial_state(size);
        self.undo.clear();
        self.generation += 1;
        debug!(size = size.dim(), generation = self.generation, "new game");
    }

    fn advance(&mut self, next: GameState) {
        let prev = std::mem::replace(&mut self.state, next);
        if self.undo.len() == UNDO_LIMIT {
            self.undo.pop_front();
        }
        self.undo.push_back(prev);
        self.generation += 1;
    }

    pub fn play(&mut self, row: usize, col: usize) -> Result<&GameState, SessionError> {
        let next = try_move(&self.state, row, col)?;
        self.advance(next);
        Ok(&self.state)
    }

    pub fn pass(&mut self) -> &GameState {
        if !self.state.terminated {
            let next = apply_pass(&self.state);
            self.advance(next);
        }
        &self.state
    }

    pub fn resign(&mut self) -> &GameState {
        if !self.state.terminated {
            let next = apply_resign(&self.state);
            self.advance(next);
        }
        &self.state
    }

    /// Restore the previous state. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop_back() {
            Some(prev) => {
                self.state = prev;
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    pub fn ai_request(&self) -> AiRequest {
        AiRequest {
            generation: self.generation,
            state: self.state.clone(),
        }
    }

    /// Compute an AI reply on a background thread after `delay`.
    pub fn spawn_ai(&self, seed: u64, delay: Duration) -> JoinHandle<AiReply> {
        let request = self.ai_request();
        thread::spawn(move || {
            thread::sleep(delay);
            let mut rng = fastrand::Rng::with_seed(seed);
            request.compute(&mut rng)
        })
    }

    /// Apply an AI reply if it was computed against the current state.
    pub fn commit(&mut self, reply: AiReply) -> Result<&GameState, SessionError> {
        if reply.generation != self.generation {
            warn!(
                reply = reply.generation,
                current = self.generation,
                "discarding stale AI reply"
            );
            return Err(SessionError::Stale {
                reply: reply.generation,
                current: self.generation,
            });
        }
        match reply.mv {
            AiMove::Place((row, col)) => self.play(row, col),
            AiMove::Pass => Ok(self.pass()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Player};

    #[test]
    fn test_play_and_undo() {
        let mut session = GameSession::new(BoardSize::Nine);
        session.play(4, 4).unwrap();
        assert_eq!(session.state().board.get(4, 4), Some(Cell::Black));
        assert_eq!(session.generation(), 1);
        assert!(session.undo());
        assert_eq!(session.state().board.get(4, 4), Some(Cell::Empty));
        assert_eq!(session.generation(), 2);
        assert!(!session.undo());
    }

    #[test]
    fn test_undo_history_is_capped() {
        let mut session = GameSession::new(BoardSize::Nineteen);
        let moves = UNDO_LIMIT + 6;
        for i in 0..moves {
            session.play((i / 10) * 2, (i % 10) * 2).unwrap();
        }
        for _ in 0..UNDO_LIMIT {
            assert!(session.undo());
        }
        assert!(!session.undo());
        assert_eq!(session.state().move_count as usize, moves - UNDO_LIMIT);
    }

    #[test]
    fn test_illegal_play_keeps_state() {
        let mut session = GameSession::new(BoardSize::Nine);
        session.play(4, 4).unwrap();
        let err = session.play(4, 4).unwrap_err();
        assert_eq!(err, SessionError::Illegal(MoveError::Occupied));
        assert_eq!(session.generation(), 1);
        assert_eq!(session.state().current_player, Player::White);
    }

    #[test]
    fn test_fresh_reply_is_committed() {
        let mut session = GameSession::new(BoardSize::Nine);
        let mut rng = fastrand::Rng::with_seed(7);
        let reply = session.ai_request().compute(&mut rng);
        session.commit(reply).unwrap();
        assert_eq!(session.state().move_count, 1);
    }

    #[test]
    fn test_reply_after_new_game_is_stale() {
        let mut session = GameSession::new(BoardSize::Nine);
        session.play(2, 2).unwrap();
        let request = session.ai_request();
        session.new_game(BoardSize::Nine);
        let reply = request.compute(&mut fastrand::Rng::with_seed(1));
        assert_eq!(
            session.commit(reply),
            Err(SessionError::Stale {
                reply: 1,
                current: 2
            })
        );
        assert_eq!(session.state().move_count, 0);
    }

    #[test]
    fn test_reply_after_undo_is_stale() {
        let mut session = GameSession::new(BoardSize::Nine);
        session.play(2, 2).unwrap();
        let request = session.ai_request();
        session.undo();
        let reply = request.compute(&mut fastrand::Rng::with_seed(1));
        assert!(matches!(
            session.commit(reply),
            Err(SessionError::Stale { .. })
        ));
    }

    #[test]
    fn test_spawned_ai() {
        let mut session = GameSession::new(BoardSize::Nine);
        let handle = session.spawn_ai(3, Duration::ZERO);
        let reply = handle.join().unwrap();
        assert!(session.commit(reply).is_ok());
        assert_eq!(session.state().current_player, Player::White);
    }

    #[test]
    fn test_pass_and_resign_after_end_are_noops() {
        let mut session = GameSession::new(BoardSize::Nine);
        session.resign();
        let generation = session.generation();
        session.pass();
        session.resign();
        assert_eq!(session.generation(), generation);
    }
}
