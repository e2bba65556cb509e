//! Breadth first search with pruning of already seen boards.
//!
//! All states of one depth are compared against the goal before any state
//! of the next depth, so the first goal match lies on a shortest route.

use log::trace;

use crate::error::SolveError;
use crate::puzzle::Puzzle;
use crate::route::Route;
use crate::solver::{expand, root, Progress, SolverConfig};
use crate::store::StateStore;

pub(crate) fn search<F>(
    puzzle: &Puzzle,
    config: &SolverConfig,
    mut progress: F,
) -> Result<Option<Route>, SolveError>
where
    F: FnMut(Progress),
{
    let mut store = StateStore::new(config.max_states);
    let mut level = vec![root(puzzle, &mut store, |_| 0)?];
    let mut next_level = Vec::new();

    let mut compared = 0;
    let mut depth = 0;

    while !level.is_empty() {
        trace!(
            "depth {}: {} states, {} discovered",
            depth,
            level.len(),
            store.len()
        );

        for &id in &level {
            compared += 1;
            let found = puzzle.is_goal(&store.get(id).board);
            progress(Progress {
                compared,
                discovered: store.len(),
                depth,
            });

            if found {
                return Ok(Some(Route::reconstruct(puzzle, &store, id)));
            }

            expand(puzzle, &mut store, id, |_, _| 0, |child, _| {
                next_level.push(child)
            })?;
        }

        level.clear();
        std::mem::swap(&mut level, &mut next_level);
        depth += 1;
    }

    Ok(None)
}
