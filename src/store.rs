//! Arena of search states with board-keyed deduplication.
//!
//! Every state generated during one search lives in a single `Vec` and is
//! addressed by `StateId`. Parent links are ids into the same arena, so the
//! ancestry of any state can be walked after the search has finished.

use std::collections::hash_map::{Entry, HashMap};
use std::hash::BuildHasher;

use crate::error::SolveError;
use crate::fingerprint::SdbmBuildHasher;
use crate::puzzle::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

/// A board plus the bookkeeping of the search that generated it.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub board: Board,
    /// Moves made since the start board.
    pub cost: usize,
    /// Priority key; only meaningful to the heuristic search.
    pub score: usize,
    pub parent: Option<StateId>,
}

/// Outcome of `StateStore::insert_if_absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    New(StateId),
    Existing(StateId),
}

/// Deduplicating state arena. No two states hold equal boards.
#[derive(Debug)]
pub struct StateStore<S = SdbmBuildHasher> {
    states: Vec<SearchState>,
    index: HashMap<Board, StateId, S>,
    limit: Option<usize>,
}

impl StateStore {
    pub fn new(limit: Option<usize>) -> Self {
        Self::with_hasher(limit, SdbmBuildHasher::default())
    }
}

impl<S: BuildHasher> StateStore<S> {
    pub fn with_hasher(limit: Option<usize>, hasher: S) -> Self {
        Self {
            states: Vec::new(),
            index: HashMap::with_hasher(hasher),
            limit,
        }
    }

    /// Stores `board` unless an equal board is already known.
    ///
    /// An existing state is returned untouched: its cost, score and parent
    /// stay those of the first discovery. `score` is only evaluated for new
    /// states.
    pub fn insert_if_absent(
        &mut self,
        board: Board,
        parent: Option<StateId>,
        cost: usize,
        score: impl FnOnce(&Board) -> usize,
    ) -> Result<Insert, SolveError> {
        let id = StateId(self.states.len());

        // Reserve before taking the entry so a failed allocation leaves the
        // index and the arena consistent.
        self.states.try_reserve(1)?;
        self.index.try_reserve(1)?;

        match self.index.entry(board) {
            Entry::Occupied(entry) => Ok(Insert::Existing(*entry.get())),
            Entry::Vacant(entry) => {
                if let Some(limit) = self.limit {
                    if self.states.len() >= limit {
                        return Err(SolveError::StateLimit { limit });
                    }
                }
                let board = entry.key().clone();
                let score = score(&board);
                entry.insert(id);
                self.states.push(SearchState {
                    board,
                    cost,
                    score,
                    parent,
                });
                Ok(Insert::New(id))
            }
        }
    }

    pub fn get(&self, id: StateId) -> &SearchState {
        &self.states[id.0]
    }

    #[cfg(test)]
    fn find(&self, board: &Board) -> Option<StateId> {
        self.index.get(board).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Ids from `id` back to the root, `id` first.
    pub fn ancestry(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        std::iter::successors(Some(id), move |&current| self.get(current).parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{BuildHasherDefault, Hasher};

    use crate::puzzle::{Move, Puzzle};

    /// Sends every board to the same bucket.
    #[derive(Default)]
    struct CollidingHasher;

    impl Hasher for CollidingHasher {
        fn write(&mut self, _bytes: &[u8]) {}

        fn finish(&self) -> u64 {
            42
        }
    }

    fn sample() -> Puzzle {
        Puzzle::new(2, 2, &[1, 2, 3, 0], &[0, 1, 3, 2]).unwrap()
    }

    #[test]
    fn test_insert_if_absent_deduplicates() {
        let puzzle = sample();
        let mut store = StateStore::new(None);

        let root = store
            .insert_if_absent(puzzle.start().clone(), None, 0, |_| 5)
            .unwrap();
        let Insert::New(root) = root else {
            panic!("root must be new");
        };

        let again = store
            .insert_if_absent(puzzle.start().clone(), Some(root), 9, |_| {
                panic!("score of a known board must not be computed")
            })
            .unwrap();
        assert_eq!(again, Insert::Existing(root));
        assert_eq!(store.len(), 1);

        // The first discovery wins.
        let state = store.get(root);
        assert_eq!(state.cost, 0);
        assert_eq!(state.score, 5);
        assert_eq!(state.parent, None);
    }

    #[test]
    fn test_colliding_fingerprints_stay_distinct() {
        let puzzle = sample();
        let mut store =
            StateStore::with_hasher(None, BuildHasherDefault::<CollidingHasher>::default());

        let left = puzzle.try_move(puzzle.start(), Move::Left).unwrap();
        let up = puzzle.try_move(puzzle.start(), Move::Up).unwrap();

        let mut ids = Vec::new();
        for board in [puzzle.start().clone(), left.clone(), up.clone()] {
            match store.insert_if_absent(board, None, 0, |_| 0).unwrap() {
                Insert::New(id) => ids.push(id),
                Insert::Existing(_) => panic!("distinct board deduplicated"),
            }
        }
        assert_eq!(store.len(), 3);
        assert!(matches!(
            store.insert_if_absent(left, None, 0, |_| 0).unwrap(),
            Insert::Existing(id) if id == ids[1]
        ));
        assert_eq!(store.find(&up), Some(ids[2]));
        assert_eq!(store.get(ids[2]).board, up);
    }

    #[test]
    fn test_state_limit() {
        let puzzle = sample();
        let mut store = StateStore::new(Some(1));
        store
            .insert_if_absent(puzzle.start().clone(), None, 0, |_| 0)
            .unwrap();

        // Known boards are still answered once the budget is spent.
        assert!(store
            .insert_if_absent(puzzle.start().clone(), None, 0, |_| 0)
            .is_ok());

        let left = puzzle.try_move(puzzle.start(), Move::Left).unwrap();
        assert!(matches!(
            store.insert_if_absent(left, None, 1, |_| 0),
            Err(SolveError::StateLimit { limit: 1 })
        ));
    }

    #[test]
    fn test_ancestry_walks_to_root() {
        let puzzle = sample();
        let mut store = StateStore::new(None);

        let mut parent = None;
        let mut board = puzzle.start().clone();
        let mut ids = Vec::new();
        for (cost, direction) in [Move::Left, Move::Up, Move::Right].into_iter().enumerate() {
            if let Insert::New(id) = store
                .insert_if_absent(board.clone(), parent, cost, |_| 0)
                .unwrap()
            {
                ids.push(id);
                parent = Some(id);
            }
            board = puzzle.try_move(&board, direction).unwrap();
        }

        let walked: Vec<StateId> = store.ancestry(ids[2]).collect();
        assert_eq!(walked, vec![ids[2], ids[1], ids[0]]);
    }
}
