//! Breadth-first route search over the open grid.

use std::collections::VecDeque;

use snake_autopilot_core::{Cell, GridSize, Move, TailPolicy};

use crate::PathFinder;

/// Neighbour expansion order. Ties between equally short routes resolve in this order.
const EXPANSION_ORDER: [Move; 4] = [Move::Down, Move::Up, Move::Right, Move::Left];

/// Dense set of cells a route must not pass through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockedCells {
    grid: GridSize,
    cells: Vec<bool>,
}

impl BlockedCells {
    /// Creates an empty blocked set covering `grid`.
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            cells: vec![false; grid.cell_count()],
        }
    }

    /// Blocks every body cell. Under [`TailPolicy::Vacates`] the tail is left
    /// open unless it holds `goal`: reaching the goal grows the snake, so the
    /// tail stays where it is.
    #[must_use]
    pub fn from_body(grid: GridSize, body: &[Cell], goal: Cell, tail_policy: TailPolicy) -> Self {
        let mut blocked = Self::new(grid);
        let occupied = match tail_policy {
            TailPolicy::Vacates if body.last() != Some(&goal) => {
                &body[..body.len().saturating_sub(1)]
            }
            TailPolicy::Blocked | TailPolicy::Vacates => body,
        };
        for &cell in occupied {
            blocked.block(cell);
        }
        blocked
    }

    /// Marks the cell as blocked. Cells outside the grid are ignored.
    pub fn block(&mut self, cell: Cell) {
        if let Some(index) = self.grid.index(cell) {
            self.cells[index] = true;
        }
    }

    /// Reports whether the cell is blocked.
    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.grid
            .index(cell)
            .map_or(false, |index| self.cells[index])
    }

    /// Grid the set was built for.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    cell: Cell,
    parent: Option<usize>,
    step: Option<Move>,
}

/// Breadth-first search that reuses its buffers between requests.
///
/// Cells are marked visited when dequeued rather than when enqueued, so a cell
/// may sit in the queue several times but is expanded once. Every queued entry
/// links back to the entry it was reached from, which encodes the move
/// sequence taken to reach it.
#[derive(Debug, Default)]
pub struct BreadthFirst {
    entries: Vec<Entry>,
    queue: VecDeque<usize>,
    visited: Vec<bool>,
}

impl BreadthFirst {
    /// Creates a search with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn trace(&self, mut index: usize) -> Vec<Move> {
        let mut moves = Vec::new();
        loop {
            let entry = self.entries[index];
            let (Some(step), Some(parent)) = (entry.step, entry.parent) else {
                break;
            };
            moves.push(step);
            index = parent;
        }
        moves.reverse();
        moves
    }
}

impl PathFinder for BreadthFirst {
    fn find_path(&mut self, start: Cell, goal: Cell, blocked: &BlockedCells) -> Option<Vec<Move>> {
        let grid = blocked.grid();

        self.entries.clear();
        self.queue.clear();
        self.visited.clear();
        self.visited.resize(grid.cell_count(), false);

        self.entries.push(Entry {
            cell: start,
            parent: None,
            step: None,
        });
        self.queue.push_back(0);

        while let Some(index) = self.queue.pop_front() {
            let cell = self.entries[index].cell;
            if cell == goal {
                return Some(self.trace(index));
            }

            let Some(slot) = grid.index(cell) else {
                continue;
            };
            if self.visited[slot] {
                continue;
            }
            self.visited[slot] = true;

            for step in EXPANSION_ORDER {
                let Some(next) = cell.step(step, grid) else {
                    continue;
                };
                if blocked.is_blocked(next) {
                    continue;
                }
                self.entries.push(Entry {
                    cell: next,
                    parent: Some(index),
                    step: Some(step),
                });
                self.queue.push_back(self.entries.len() - 1);
            }
        }

        None
    }
}
