//! Solution routes.

use serde::Serialize;

use crate::puzzle::{Board, Move, Puzzle};
use crate::store::{StateId, StateStore};

/// Boards from start to goal, inclusive, and the blank moves between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    boards: Vec<Board>,
    moves: Vec<Move>,
}

impl Route {
    /// Walks the parent chain of `end` back to the root of `store`.
    pub(crate) fn reconstruct<S: std::hash::BuildHasher>(
        puzzle: &Puzzle,
        store: &StateStore<S>,
        end: StateId,
    ) -> Self {
        let mut boards: Vec<Board> = store
            .ancestry(end)
            .map(|id| store.get(id).board.clone())
            .collect();
        boards.reverse();

        let moves = boards
            .windows(2)
            .map(|pair| move_between(puzzle, &pair[0], &pair[1]))
            .collect();

        Self { boards, moves }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of boards, start and goal included.
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Compact form such as `"RDLU"`.
    pub fn moves_string(&self) -> String {
        self.moves.iter().map(Move::symbol).collect()
    }

    /// Applies the moves to the start board of `puzzle`. Returns `None` if a
    /// move would leave the board.
    pub fn replay(&self, puzzle: &Puzzle) -> Option<Vec<Board>> {
        let mut boards = Vec::with_capacity(self.moves.len() + 1);
        boards.push(puzzle.start().clone());
        for &direction in &self.moves {
            let next = puzzle.try_move(boards.last()?, direction)?;
            boards.push(next);
        }
        Some(boards)
    }
}

/// The direction the blank travelled from `from` to `to`.
fn move_between(puzzle: &Puzzle, from: &Board, to: &Board) -> Move {
    let (from_row, from_column) = puzzle.coordinates(from.blank());
    let (to_row, to_column) = puzzle.coordinates(to.blank());

    if from_row > to_row {
        Move::Up
    } else if from_row < to_row {
        Move::Down
    } else if from_column > to_column {
        Move::Left
    } else {
        Move::Right
    }
}
