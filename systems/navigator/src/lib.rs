#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure navigation system that answers plan requests with routes to the food.

mod breadth_first;

pub use breadth_first::{BlockedCells, BreadthFirst};

use log::{debug, warn};
use snake_autopilot_core::{Cell, Command, Event, GridSize, Move, SearchMethod, TailPolicy};

/// Route search strategy over a grid with blocked cells.
pub trait PathFinder {
    /// Returns the moves leading from `start` to `goal`, or `None` when no route exists.
    ///
    /// Returned routes never leave the grid and never enter a blocked cell.
    fn find_path(&mut self, start: Cell, goal: Cell, blocked: &BlockedCells) -> Option<Vec<Move>>;
}

/// Finds a shortest route with a one-off breadth-first search.
#[must_use]
pub fn find_path(start: Cell, goal: Cell, blocked: &BlockedCells) -> Option<Vec<Move>> {
    BreadthFirst::new().find_path(start, goal, blocked)
}

/// Configuration parameters required to construct the navigator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    tail_policy: TailPolicy,
}

impl Config {
    /// Creates a configuration using the provided tail policy.
    #[must_use]
    pub const fn new(tail_policy: TailPolicy) -> Self {
        Self { tail_policy }
    }
}

/// Pure system that reacts to plan requests and emits plan commands.
#[derive(Debug, Default)]
pub struct Navigator {
    tail_policy: TailPolicy,
    breadth_first: BreadthFirst,
}

impl Navigator {
    /// Creates a new navigator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tail_policy: config.tail_policy,
            breadth_first: BreadthFirst::new(),
        }
    }

    /// Tail policy applied when building blocked sets.
    #[must_use]
    pub const fn tail_policy(&self) -> TailPolicy {
        self.tail_policy
    }

    /// Consumes world events and the current body snapshot to emit plan commands.
    ///
    /// Each [`Event::PlanRequested`] yields exactly one command: either
    /// [`Command::AssignPlan`] with a non-empty route or
    /// [`Command::ReportNoPath`].
    pub fn handle(
        &mut self,
        events: &[Event],
        body: &[Cell],
        grid: GridSize,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::PlanRequested { head, food, method } = *event else {
                continue;
            };

            let blocked = BlockedCells::from_body(grid, body, food, self.tail_policy);
            let route = match self.strategy(method) {
                Some(strategy) => strategy.find_path(head, food, &blocked),
                None => {
                    warn!("search method {method} has no strategy; reporting no path");
                    None
                }
            };

            match route {
                Some(moves) if !moves.is_empty() => {
                    debug!("planned {} moves from {head} to {food}", moves.len());
                    out.push(Command::AssignPlan { moves });
                }
                _ => out.push(Command::ReportNoPath),
            }
        }
    }

    fn strategy(&mut self, method: SearchMethod) -> Option<&mut dyn PathFinder> {
        match method {
            SearchMethod::BreadthFirst => Some(&mut self.breadth_first),
            SearchMethod::DepthFirst | SearchMethod::Bidirectional => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(head: Cell, food: Cell, method: SearchMethod) -> Event {
        Event::PlanRequested { head, food, method }
    }

    #[test]
    fn ignores_unrelated_events() {
        let mut navigator = Navigator::default();
        let mut commands = Vec::new();

        navigator.handle(
            &[Event::Ticked { tick: 1 }, Event::FoodPlaced { cell: Cell::new(1, 1) }],
            &[Cell::new(0, 0)],
            GridSize::STANDARD,
            &mut commands,
        );

        assert!(commands.is_empty());
    }

    #[test]
    fn breadth_first_request_yields_plan() {
        let mut navigator = Navigator::default();
        let mut commands = Vec::new();

        navigator.handle(
            &[request(Cell::new(15, 10), Cell::new(15, 5), SearchMethod::BreadthFirst)],
            &[Cell::new(15, 10)],
            GridSize::STANDARD,
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![Command::AssignPlan {
                moves: vec![Move::Up; 5],
            }]
        );
    }

    #[test]
    fn labels_without_strategy_report_no_path() {
        let mut navigator = Navigator::default();
        let mut commands = Vec::new();

        navigator.handle(
            &[
                request(Cell::new(15, 10), Cell::new(15, 5), SearchMethod::DepthFirst),
                request(Cell::new(15, 10), Cell::new(15, 5), SearchMethod::Bidirectional),
            ],
            &[Cell::new(15, 10)],
            GridSize::STANDARD,
            &mut commands,
        );

        assert_eq!(commands, vec![Command::ReportNoPath, Command::ReportNoPath]);
    }

    #[test]
    fn food_under_head_reports_no_path() {
        let mut navigator = Navigator::default();
        let mut commands = Vec::new();

        navigator.handle(
            &[request(Cell::new(4, 4), Cell::new(4, 4), SearchMethod::BreadthFirst)],
            &[Cell::new(4, 4)],
            GridSize::STANDARD,
            &mut commands,
        );

        assert_eq!(commands, vec![Command::ReportNoPath]);
    }

    #[test]
    fn free_function_matches_strategy() {
        let grid = GridSize::new(6, 6);
        let blocked = BlockedCells::from_body(
            grid,
            &[Cell::new(1, 1), Cell::new(1, 2)],
            Cell::new(1, 4),
            TailPolicy::Blocked,
        );

        assert_eq!(
            find_path(Cell::new(1, 1), Cell::new(1, 4), &blocked),
            BreadthFirst::new().find_path(Cell::new(1, 1), Cell::new(1, 4), &blocked)
        );
    }

    #[test]
    fn config_carries_tail_policy() {
        let navigator = Navigator::new(Config::new(TailPolicy::Vacates));
        assert_eq!(navigator.tail_policy(), TailPolicy::Vacates);
        assert_eq!(Navigator::default().tail_policy(), TailPolicy::Blocked);
    }
}
