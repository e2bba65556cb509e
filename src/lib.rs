//! Solver for sliding tile puzzles on N x M boards.
//!
//! A [`Puzzle`] pairs a start and a goal board. [`Puzzle::solvable`] decides
//! reachability from the permutation parity alone; [`solve_optimal`] runs a
//! breadth first search that returns a shortest [`Route`], and [`solve_fast`]
//! runs a heuristic best first search that trades route length for speed.

pub mod error;
pub mod fast;
pub mod fingerprint;
mod optimal;
pub mod puzzle;
pub mod route;
pub mod solver;
mod store;

// Re-export main types
pub use error::{BoardKind, PuzzleError, SolveError};
pub use puzzle::{canonical_goal, Board, Move, Puzzle, Slide, MAX_CELLS};
pub use route::Route;
pub use solver::{solve_fast, solve_optimal, Progress, Solver, SolverConfig, Strategy};
