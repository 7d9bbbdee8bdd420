#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the snake autopilot.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title presented by adapters when the session window opens.
pub const WINDOW_TITLE: &str = "AI Snake Game";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resumes autonomous play from the paused state.
    Start,
    /// Suspends autonomous play without discarding the session.
    Pause,
    /// Recreates the snake and food and returns to the paused state.
    Reset,
    /// Records the requested search label and resets the session.
    SelectSearchMethod {
        /// Label chosen by the player.
        method: SearchMethod,
    },
    /// Advances the session by exactly one discrete step.
    Tick,
    /// Supplies the plan requested by the most recent pending tick.
    AssignPlan {
        /// Unit moves leading from the head to the food.
        moves: Vec<Move>,
    },
    /// Reports that no route from the head to the food exists.
    ReportNoPath,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that a running session consumed a tick.
    Ticked {
        /// Monotonic index of the tick since the world was created.
        tick: u64,
    },
    /// Announces that the session entered a new play state.
    PlayStateChanged {
        /// State that became active after processing commands.
        state: PlayState,
    },
    /// Confirms that the snake and food were recreated.
    GameReset {
        /// Cell occupied by the single-segment snake.
        head: Cell,
        /// Cell holding the freshly placed food.
        food: Cell,
    },
    /// Confirms that a new search label was recorded.
    SearchMethodSelected {
        /// Label that is now active.
        method: SearchMethod,
    },
    /// Requests a route from the head to the food for the pending tick.
    PlanRequested {
        /// Current head of the snake.
        head: Cell,
        /// Current food position.
        food: Cell,
        /// Search label active when the request was raised.
        method: SearchMethod,
    },
    /// Confirms that a plan was accepted.
    PlanAssigned {
        /// Number of moves stored in the accepted plan.
        moves: usize,
    },
    /// Reports that a supplied plan failed validation.
    PlanRejected {
        /// Specific reason the plan was refused.
        reason: PlanError,
    },
    /// Confirms that the head moved between two adjacent cells.
    SnakeAdvanced {
        /// Cell the head occupied before the move.
        from: Cell,
        /// Cell the head occupies after the move.
        to: Cell,
    },
    /// Confirms that the head reached the food and the snake grew.
    FoodEaten {
        /// Cell the food occupied.
        cell: Cell,
        /// Length of the snake after growing.
        length: usize,
    },
    /// Confirms that food was placed at a new cell.
    FoodPlaced {
        /// Cell now holding the food.
        cell: Cell,
    },
    /// Announces that no route to the food exists and play halted.
    SnakeTrapped {
        /// Head of the snake when the search failed.
        head: Cell,
        /// Food the search failed to reach.
        food: Cell,
    },
}

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// Updates are suspended until the player starts the session.
    Paused,
    /// Each tick advances the snake along its plan.
    Running,
    /// The navigator found no route; only a reset resumes play.
    Trapped,
}

/// Search labels the player may select from the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMethod {
    /// Breadth-first search over the open grid.
    #[default]
    BreadthFirst,
    /// Depth-first search label.
    DepthFirst,
    /// Bidirectional search label.
    Bidirectional,
}

impl SearchMethod {
    /// Short label shown to the player.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BreadthFirst => "BFS",
            Self::DepthFirst => "DFS",
            Self::Bidirectional => "Bidirectional",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decides whether the tail cell counts as blocked during route searches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TailPolicy {
    /// Every body cell, including the tail, blocks the search.
    #[default]
    Blocked,
    /// The tail cell is treated as free because it vacates on the next step.
    Vacates,
}

/// Decides which cells are eligible when food is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPolicy {
    /// Any cell of the grid, including cells covered by the snake.
    Uniform,
    /// Only cells not covered by the snake.
    #[default]
    AvoidSnake,
}

/// Reasons a plan supplied through [`Command::AssignPlan`] may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanError {
    /// The plan contained no moves.
    Empty,
    /// Applying the move at `step` would leave the grid.
    LeavesGrid {
        /// Zero-based index of the offending move.
        step: usize,
    },
    /// Applying the move at `step` would run the head into the body.
    CrossesBody {
        /// Zero-based index of the offending move.
        step: usize,
    },
    /// The plan ends on a cell other than the food.
    MissesFood,
}

/// One of the four unit deltas available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Move {
    /// Column and row delta applied by the move.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Returns the move that leads from `from` to the adjacent cell `to`.
    #[must_use]
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::Right)
            } else {
                Some(Self::Left)
            }
        } else if to.row() > from.row() {
            Some(Self::Down)
        } else {
            Some(Self::Up)
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    column: u32,
    row: u32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Applies `step` and returns the neighbouring cell when it stays inside `grid`.
    #[must_use]
    pub fn step(self, step: Move, grid: GridSize) -> Option<Cell> {
        let column = match step {
            Move::Left => self.column.checked_sub(1)?,
            Move::Right => self.column.checked_add(1)?,
            Move::Up | Move::Down => self.column,
        };
        let row = match step {
            Move::Up => self.row.checked_sub(1)?,
            Move::Down => self.row.checked_add(1)?,
            Move::Left | Move::Right => self.row,
        };

        let next = Cell::new(column, row);
        grid.contains(next).then_some(next)
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Dimensions of the playing field measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Field used by every session: a 600x400 canvas split into 20-pixel cells.
    pub const STANDARD: Self = Self::new(30, 20);

    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.column < self.columns && cell.row < self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row).ok()?;
        let column = usize::try_from(cell.column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell where a freshly reset snake starts.
    #[must_use]
    pub const fn start_cell(&self) -> Cell {
        Cell::new(self.columns / 2, self.rows / 2)
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| Cell::new(column, row)))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::STANDARD
    }
}
