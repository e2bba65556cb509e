//! Best first search ordered by `cost + 2 * heuristic`.
//!
//! Weighting the heuristic twice as heavy as the cost so far makes the
//! search greedy: it usually reaches the goal after a fraction of the states
//! the breadth first search needs, but the route is not always the shortest.
//! A board keeps the score of its first discovery; later, cheaper paths to it
//! are dropped.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::SolveError;
use crate::puzzle::{Board, Puzzle};
use crate::route::Route;
use crate::solver::{expand, root, Progress, SolverConfig};
use crate::store::{StateId, StateStore};

pub const HEURISTIC_WEIGHT: usize = 2;

pub fn score(puzzle: &Puzzle, board: &Board, cost: usize) -> usize {
    cost + HEURISTIC_WEIGHT * puzzle.heuristic(board)
}

/// Priority queue of states. Lowest score first, equal scores in insertion
/// order.
#[derive(Debug, Default)]
struct OpenList {
    heap: BinaryHeap<Reverse<(usize, u64, StateId)>>,
    sequence: u64,
}

impl OpenList {
    fn push(&mut self, score: usize, id: StateId) {
        self.heap.push(Reverse((score, self.sequence, id)));
        self.sequence += 1;
    }

    fn pop(&mut self) -> Option<StateId> {
        self.heap.pop().map(|Reverse((_, _, id))| id)
    }
}

pub(crate) fn search<F>(
    puzzle: &Puzzle,
    config: &SolverConfig,
    mut progress: F,
) -> Result<Option<Route>, SolveError>
where
    F: FnMut(Progress),
{
    let mut store = StateStore::new(config.max_states);
    let mut open = OpenList::default();

    let start = root(puzzle, &mut store, |board| score(puzzle, board, 0))?;
    open.push(store.get(start).score, start);

    let mut compared = 0;
    while let Some(id) = open.pop() {
        compared += 1;
        let state = store.get(id);
        let found = puzzle.is_goal(&state.board);
        progress(Progress {
            compared,
            discovered: store.len(),
            depth: state.cost,
        });

        if found {
            return Ok(Some(Route::reconstruct(puzzle, &store, id)));
        }

        expand(
            puzzle,
            &mut store,
            id,
            |board, cost| score(puzzle, board, cost),
            |child, score| open.push(score, child),
        )?;
    }

    Ok(None)
}
