//! Error types for puzzle construction and search.

use std::collections::TryReserveError;

/// Which of the two boards of a puzzle an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardKind {
    Start,
    Goal,
}

impl std::fmt::Display for BoardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardKind::Start => write!(f, "start"),
            BoardKind::Goal => write!(f, "goal"),
        }
    }
}

/// A puzzle that violates the construction contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("board dimensions must be positive, got {rows}x{columns}")]
    ZeroDimension { rows: usize, columns: usize },
    #[error("board has {cells} cells, at most 255 are supported")]
    TooLarge { cells: usize },
    #[error("{which} board has {actual} cells, expected {expected}")]
    WrongLength {
        which: BoardKind,
        expected: usize,
        actual: usize,
    },
    #[error("{which} board is not a permutation of 0..{size}: bad or repeated tile {value}")]
    NotAPermutation {
        which: BoardKind,
        size: usize,
        value: u8,
    },
}

/// A search that had to stop before reaching a verdict.
#[derive(thiserror::Error, Debug)]
pub enum SolveError {
    #[error("search exceeded the limit of {limit} states")]
    StateLimit { limit: usize },
    #[error("out of memory while storing search states: {0}")]
    OutOfMemory(#[from] TryReserveError),
}
