use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use log::{info, warn};
use rand::Rng;

use crate::board::Board;
use crate::config::Config;
use crate::direction::Dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Save,
    Restart,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved,
    Blocked,
    Saved(PathBuf),
    SaveFailed,
    Restarted,
    Ignored,
    Quit,
}

impl Outcome {
    /// Whether the screen needs redrawing.
    pub fn has_update(&self) -> bool {
        !matches!(self, Outcome::Blocked | Outcome::Ignored | Outcome::Quit)
    }
}

/// One running game plus the bits of shell state the renderer shows.
pub struct Session {
    board: Board,
    output: PathBuf,
    status: Option<String>,
}

impl Session {
    pub fn new(board: Board, output: impl Into<PathBuf>) -> Self {
        Self {
            board,
            output: output.into(),
            status: None,
        }
    }

    /// Loads `--input` if given, otherwise starts a fresh board. A file that
    /// fails to load is reported and replaced by a fresh board.
    pub fn from_config(config: &Config) -> Self {
        let size = config.board_size();
        let mut status = None;
        let board = match &config.input {
            Some(path) => match Board::load(path) {
                Ok(board) => board,
                Err(err) => {
                    warn!("{}; starting a new {}x{} board", err, size, size);
                    status = Some(format!("Load failed: {}", err));
                    Board::new(size)
                }
            },
            None => Board::new(size),
        };
        let mut session = Self::new(board, config.output.clone());
        session.status = status;
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn apply(&mut self, command: Command, rng: &mut impl Rng) -> Outcome {
        match command {
            Command::Move(Dir::Stay) => Outcome::Ignored,
            Command::Move(dir) => {
                if self.board.is_game_over() {
                    Outcome::Ignored
                } else if !self.board.can_move(Some(dir)) {
                    Outcome::Blocked
                } else {
                    self.board.move_player(dir, rng);
                    if self.board.is_game_over() {
                        info!("game over with score {}", self.board.score());
                    }
                    Outcome::Moved
                }
            }
            Command::Save => match self.board.save(&self.output) {
                Ok(()) => {
                    self.status = Some(format!("Saved to {}", self.output.display()));
                    Outcome::Saved(self.output.clone())
                }
                Err(err) => {
                    warn!("{}", err);
                    self.status = Some(format!("Save failed: {}", err));
                    Outcome::SaveFailed
                }
            },
            Command::Restart => {
                if !self.board.is_game_over() {
                    return Outcome::Ignored;
                }
                let size = self.board.size();
                info!("starting a new {}x{} board", size, size);
                self.board = Board::new(size);
                self.status = None;
                Outcome::Restarted
            }
            Command::Quit => Outcome::Quit,
        }
    }
}

pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Dir::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Dir::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Dir::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::Move(Dir::Right)),
        KeyCode::Char('s') => Some(Command::Save),
        KeyCode::Char(' ') => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
