use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read board file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("board file ends before line {line}")]
    MissingLine { line: usize },
    #[error("line {line}: expected a non-negative integer, found {value:?}")]
    InvalidNumber { line: usize, value: String },
    #[error("board size must be at least 1, found {0}")]
    InvalidSize(usize),
    #[error("row {row}: expected {expected} cells, found {found}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("more than four ghosts, extra one at ({row}, {col})")]
    TooManyGhosts { row: usize, col: usize },
    #[error("expected four ghosts, found {0}")]
    GhostCount(usize),
    #[error("board has no player")]
    MissingPlayer,
    #[error("second player at ({row}, {col})")]
    DuplicatePlayer { row: usize, col: usize },
    #[error("unexpected rows after the board")]
    TrailingRows,
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("could not write board file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
