//! Search configuration and the entry points shared by both strategies.

use std::hash::BuildHasher;
use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::error::SolveError;
use crate::puzzle::{Board, Puzzle};
use crate::route::Route;
use crate::store::{Insert, StateId, StateStore};
use crate::{fast, optimal};

/// Search discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Level by level; always returns a shortest route.
    Optimal,
    /// Best first on a heuristic score; usually much faster, not shortest.
    Fast,
}

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Maximum number of distinct boards a search may generate
    pub max_states: Option<usize>,
}

/// Snapshot handed to the progress callback after every goal comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    /// States compared against the goal so far.
    pub compared: usize,
    /// Distinct boards generated so far, the start included.
    pub discovered: usize,
    /// Moves from the start to the state just compared.
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `puzzle`, reporting progress to `progress`.
    ///
    /// Returns `Ok(None)` when the goal is unreachable. Unsolvable puzzles
    /// are rejected by the parity test before any state is generated.
    pub fn solve<F>(
        &self,
        puzzle: &Puzzle,
        strategy: Strategy,
        progress: F,
    ) -> Result<Option<Route>, SolveError>
    where
        F: FnMut(Progress),
    {
        if !puzzle.solvable() {
            debug!("puzzle is not solvable, skipping search");
            return Ok(None);
        }

        debug!(
            "solving {}x{} puzzle with {:?} search, state limit {:?}",
            puzzle.rows(),
            puzzle.columns(),
            strategy,
            self.config().max_states
        );
        let started = Instant::now();

        let route = match strategy {
            Strategy::Optimal => optimal::search(puzzle, self.config(), progress)?,
            Strategy::Fast => fast::search(puzzle, self.config(), progress)?,
        };

        match &route {
            Some(route) => debug!(
                "found route of {} moves in {:?}",
                route.moves().len(),
                started.elapsed()
            ),
            None => debug!("search space exhausted after {:?}", started.elapsed()),
        }
        Ok(route)
    }

    pub fn solve_optimal<F: FnMut(Progress)>(
        &self,
        puzzle: &Puzzle,
        progress: F,
    ) -> Result<Option<Route>, SolveError> {
        self.solve(puzzle, Strategy::Optimal, progress)
    }

    pub fn solve_fast<F: FnMut(Progress)>(
        &self,
        puzzle: &Puzzle,
        progress: F,
    ) -> Result<Option<Route>, SolveError> {
        self.solve(puzzle, Strategy::Fast, progress)
    }
}

/// Shortest route with the default configuration.
pub fn solve_optimal(puzzle: &Puzzle) -> Result<Option<Route>, SolveError> {
    Solver::default().solve_optimal(puzzle, |_| {})
}

/// Some route, found quickly, with the default configuration.
pub fn solve_fast(puzzle: &Puzzle) -> Result<Option<Route>, SolveError> {
    Solver::default().solve_fast(puzzle, |_| {})
}

/// Inserts the start board as the root of a fresh search.
pub(crate) fn root<S: BuildHasher>(
    puzzle: &Puzzle,
    store: &mut StateStore<S>,
    score: impl FnOnce(&Board) -> usize,
) -> Result<StateId, SolveError> {
    match store.insert_if_absent(puzzle.start().clone(), None, 0, score)? {
        Insert::New(id) | Insert::Existing(id) => Ok(id),
    }
}

/// Generates the unseen children of `id` in expansion order and hands each
/// new state with its score to `on_new`. Children whose board is already
/// stored are dropped.
pub(crate) fn expand<S: BuildHasher>(
    puzzle: &Puzzle,
    store: &mut StateStore<S>,
    id: StateId,
    score: impl Fn(&Board, usize) -> usize,
    mut on_new: impl FnMut(StateId, usize),
) -> Result<(), SolveError> {
    let parent = store.get(id);
    let cost = parent.cost + 1;
    let board = parent.board.clone();

    for slide in puzzle.neighbors(&board) {
        let child = board.slide(slide.target);
        if let Insert::New(child_id) =
            store.insert_if_absent(child, Some(id), cost, |b| score(b, cost))?
        {
            on_new(child_id, store.get(child_id).score);
        }
    }
    Ok(())
}
