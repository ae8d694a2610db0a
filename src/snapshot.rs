//! Plain-text board snapshots.
//!
//! ```text
//! 10          <- size
//! 120         <- score
//! 2           <- move counter
//! D***  ***L  <- `size` rows of `size` cells
//! ...
//! ```
//!
//! Cells use the same markers as the rendered grid. `X` stands for the
//! player with a ghost on top, a space for an eaten dot.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::board::{Board, CHERRY, COLLISION, EATEN, GHOST_COUNT, PLAYER};
use crate::direction::Facing;
use crate::entity::Character;
use crate::error::{LoadError, SaveError};

const HEADER_LINES: usize = 3;

impl Board {
    /// Reads a snapshot from disk. Nothing is returned unless the whole file
    /// parses.
    pub fn load(path: impl AsRef<Path>) -> Result<Board, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let board = Board::parse(&text)?;
        info!(
            "loaded {}x{} board from {} (score {})",
            board.size(),
            board.size(),
            path.display(),
            board.score()
        );
        Ok(board)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        fs::write(path, self.to_snapshot()).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("saved board to {}", path.display());
        Ok(())
    }

    pub fn to_snapshot(&self) -> String {
        let mut out = format!("{}\n{}\n{}\n", self.size(), self.score(), self.move_count());
        for row in self.grid() {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }

    pub fn parse(text: &str) -> Result<Board, LoadError> {
        let mut lines = text.lines();
        let size = header_number(lines.next(), 1)?;
        if size == 0 {
            return Err(LoadError::InvalidSize(size));
        }
        let score = header_number(lines.next(), 2)?;
        let move_count = header_number(lines.next(), 3)?;
        let score = u32::try_from(score).map_err(|_| LoadError::InvalidNumber {
            line: 2,
            value: score.to_string(),
        })?;
        let move_count = u32::try_from(move_count).map_err(|_| LoadError::InvalidNumber {
            line: 3,
            value: move_count.to_string(),
        })?;

        // Rows are checked before anything is sized from the header.
        let rows: Vec<&str> = lines.by_ref().take(size).collect();
        if rows.len() < size {
            return Err(LoadError::MissingLine {
                line: HEADER_LINES + rows.len() + 1,
            });
        }
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(row, line)| {
                let cells: Vec<char> = line.chars().collect();
                if cells.len() == size {
                    Ok(cells)
                } else {
                    Err(LoadError::RowLength {
                        row,
                        expected: size,
                        found: cells.len(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut visited = vec![vec![false; size]; size];
        let mut cherries = vec![vec![false; size]; size];
        let mut player = None;
        let mut ghosts = [Character::new(0, 0, Facing::Right); GHOST_COUNT];
        let mut ghost_count = 0;

        let mut add_ghost = |row: usize, col: usize, facing: Facing| {
            if ghost_count == GHOST_COUNT {
                return Err(LoadError::TooManyGhosts { row, col });
            }
            ghosts[ghost_count] = Character::new(row, col, facing);
            ghost_count += 1;
            Ok(())
        };

        for (row, cells) in rows.iter().enumerate() {
            for (col, &c) in cells.iter().enumerate() {
                match c {
                    PLAYER | COLLISION => {
                        if player.is_some() {
                            return Err(LoadError::DuplicatePlayer { row, col });
                        }
                        player = Some(Character::new(row, col, Facing::Right));
                        visited[row][col] = true;
                        if c == COLLISION {
                            add_ghost(row, col, Facing::Right)?;
                        }
                    }
                    CHERRY => cherries[row][col] = true,
                    EATEN => visited[row][col] = true,
                    other => {
                        if let Some(facing) = Facing::from_ghost_glyph(other) {
                            add_ghost(row, col, facing)?;
                        }
                    }
                }
            }
        }

        if lines.any(|line| !line.trim().is_empty()) {
            return Err(LoadError::TrailingRows);
        }
        let player = player.ok_or(LoadError::MissingPlayer)?;
        if ghost_count != GHOST_COUNT {
            return Err(LoadError::GhostCount(ghost_count));
        }

        Ok(Board::from_parts(
            size, score, move_count, visited, cherries, player, ghosts,
        ))
    }
}

impl FromStr for Board {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::parse(s)
    }
}

fn header_number(line: Option<&str>, number: usize) -> Result<usize, LoadError> {
    let line = line.ok_or(LoadError::MissingLine { line: number })?;
    let value = line.trim();
    value.parse().map_err(|_| LoadError::InvalidNumber {
        line: number,
        value: value.to_string(),
    })
}
