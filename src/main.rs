//! Weiqi: a Go engine with a heuristic opponent.
//!
//! ## Usage
//!
//! - `weiqi` - Show a demo
//! - `weiqi gtp` - Start GTP server for GUI integration
//! - `weiqi selfplay` - Let the AI play both sides

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use weiqi::ai::{AiMove, select_move};
use weiqi::board::BoardSize;
use weiqi::gtp::GtpEngine;
use weiqi::notation::to_display_notation;
use weiqi::rules::{apply_move, apply_pass};
use weiqi::scoring::score;
use weiqi::session::GameSession;
use weiqi::state::create_initial_state;

/// Weiqi: a Go engine with a heuristic opponent
#[derive(Parser)]
#[command(name = "weiqi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Copy)]
struct GameOpts {
    /// Board size: 9, 13 or 19
    #[arg(long, default_value_t = 9)]
    size: usize,
    /// Seed for the AI's random jitter
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

impl GameOpts {
    fn board_size(&self) -> Result<BoardSize> {
        BoardSize::try_from(self.size).context("invalid --size")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp(GameOpts),
    /// Run a short demo of the engine
    Demo {
        #[command(flatten)]
        game: GameOpts,
        /// Artificial AI thinking delay in milliseconds
        #[arg(long, default_value_t = 200)]
        think_ms: u64,
    },
    /// Let the AI play against itself
    Selfplay {
        #[command(flatten)]
        game: GameOpts,
        /// Stop after this many turns if the game has not ended
        #[arg(long, default_value_t = 400)]
        max_moves: usize,
        /// Print the final game state as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp(game)) => GtpEngine::new(game.board_size()?, game.seed).run(),
        Some(Commands::Selfplay {
            game,
            max_moves,
            json,
        }) => run_selfplay(game, max_moves, json),
        Some(Commands::Demo { game, think_ms }) => run_demo(game, think_ms),
        None => run_demo(
            GameOpts {
                size: 9,
                seed: 1,
            },
            200,
        ),
    }
}

fn run_demo(game: GameOpts, think_ms: u64) -> Result<()> {
    let size = game.board_size()?;
    let delay = Duration::from_millis(think_ms);
    println!("Weiqi: Go engine with a heuristic opponent\n");

    let mut session = GameSession::new(size);
    session.play(2, 2)?;
    println!("Black plays {}", describe(AiMove::Place((2, 2)), size.dim()));

    let reply = session
        .spawn_ai(game.seed, delay)
        .join()
        .map_err(|_| anyhow::anyhow!("AI thread panicked"))?;
    session.commit(reply)?;
    println!("White answers {}", describe(reply.mv, size.dim()));
    println!("{}", session.state().board);

    // A reply computed for the previous game must not land on the new one.
    let pending = session.spawn_ai(game.seed, delay);
    session.new_game(size);
    let stale = pending
        .join()
        .map_err(|_| anyhow::anyhow!("AI thread panicked"))?;
    match session.commit(stale) {
        Ok(_) => println!("unexpected: stale reply was applied"),
        Err(err) => println!("After starting a new game: {err}"),
    }
    Ok(())
}

fn run_selfplay(game: GameOpts, max_moves: usize, json: bool) -> Result<()> {
    let size = game.board_size()?;
    let mut rng = fastrand::Rng::with_seed(game.seed);
    let mut state = create_initial_state(size);

    for _ in 0..max_moves {
        if state.terminated {
            break;
        }
        state = match select_move(&state, &mut rng) {
            AiMove::Place((row, col)) => apply_move(&state, row, col),
            AiMove::Pass => apply_pass(&state),
        };
    }

    let result = score(&state);
    info!(
        moves = state.move_count,
        terminated = state.terminated,
        result = %result.result_string(),
        "selfplay finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", state.board);
        println!(
            "Captures: black {} white {}",
            state.captures.black, state.captures.white
        );
        println!("Result: {}", result.result_string());
    }
    Ok(())
}

fn describe(mv: AiMove, size: usize) -> String {
    match mv {
        AiMove::Place((row, col)) => to_display_notation(row, col, size).unwrap_or_default(),
        AiMove::Pass => "pass".to_string(),
    }
}
