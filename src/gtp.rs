//! Go Text Protocol (GTP) front end.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements the subset of GTP version 2 needed to play games
//! against the heuristic opponent from a GUI such as Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - 9, 13 or 19
//! - `clear_board`
//! - `komi <value>` - only 6.5 is accepted
//! - `play <color> <vertex|pass|resign>`
//! - `genmove <color>`
//! - `undo`
//! - `showboard`
//! - `final_score`
//!
//! Unlike standard GTP v2, which lets either color play at any time, the
//! engine strictly alternates: `play` and `genmove` for the color that is not
//! on turn are answered with an error.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::{debug, info};

use crate::ai::AiMove;
use crate::board::{BoardSize, Player};
use crate::constants::{KOMI, PASS_LIMIT};
use crate::notation::{parse_notation, to_display_notation};
use crate::scoring::score;
use crate::session::GameSession;
use crate::state::Winner;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    session: GameSession,
    size: BoardSize,
    rng: fastrand::Rng,
}

impl GtpEngine {
    pub fn new(size: BoardSize, seed: u64) -> Self {
        Self {
            session: GameSession::new(size),
            size,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Run the GTP command loop on stdin/stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        self.serve(stdin.lock(), io::stdout())
    }

    /// Run the GTP command loop until `quit` or end of input.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            debug!(%command, success, "gtp");

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_color(arg: &str) -> Option<Player> {
        match arg.to_lowercase().as_str() {
            "b" | "black" => Some(Player::Black),
            "w" | "white" => Some(Player::White),
            _ => None,
        }
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&arg.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(n) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                match BoardSize::try_from(n) {
                    Ok(size) => {
                        self.size = size;
                        self.session.new_game(size);
                        (true, String::new())
                    }
                    Err(_) => (false, "unacceptable size".to_string()),
                }
            }

            "clear_board" => {
                self.session.new_game(self.size);
                (true, String::new())
            }

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<f64>() {
                    Ok(komi) if komi == KOMI => (true, String::new()),
                    Ok(_) => (false, format!("only komi {KOMI} is supported")),
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(color) = Self::parse_color(args[0]) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.session.state().current_player {
                    return (false, format!("it is not {color}'s turn"));
                }

                let vertex = args[1].to_lowercase();
                match vertex.as_str() {
                    "pass" => {
                        self.session.pass();
                        (true, String::new())
                    }
                    "resign" => {
                        self.session.resign();
                        (true, String::new())
                    }
                    _ => {
                        let size = self.session.state().size();
                        let Some((row, col)) = parse_notation(&vertex, size) else {
                            return (false, "invalid vertex".to_string());
                        };
                        match self.session.play(row, col) {
                            Ok(_) => (true, String::new()),
                            Err(err) => (false, err.to_string()),
                        }
                    }
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|a| Self::parse_color(a)) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.session.state().current_player {
                    return (false, format!("it is not {color}'s turn"));
                }

                let reply = self.session.ai_request().compute(&mut self.rng);
                if let Err(err) = self.session.commit(reply) {
                    return (false, err.to_string());
                }
                let size = self.session.state().size();
                match reply.mv {
                    AiMove::Place((row, col)) => {
                        let vertex = to_display_notation(row, col, size).unwrap_or_default();
                        info!(%color, %vertex, "genmove");
                        (true, vertex)
                    }
                    AiMove::Pass => (true, "pass".to_string()),
                }
            }

            "undo" => {
                if self.session.undo() {
                    (true, String::new())
                } else {
                    (false, "cannot undo".to_string())
                }
            }

            "showboard" => (true, format!("\n{}", self.session.state().board)),

            "final_score" => {
                let state = self.session.state();
                match state.winner {
                    Some(winner) if state.terminated && state.pass_streak < PASS_LIMIT => {
                        // Ended by resignation
                        let letter = match winner {
                            Winner::Black => "B",
                            Winner::White => "W",
                            Winner::Draw => "0",
                        };
                        (true, format!("{letter}+R"))
                    }
                    _ => (true, score(state).result_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
