#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the snake autopilot.
//!
//! The world owns the snake body, the food, the active plan and the play
//! state. It never searches for routes itself: when a running tick finds the
//! plan empty it raises [`Event::PlanRequested`] and waits for either
//! [`Command::AssignPlan`] or [`Command::ReportNoPath`] before the tick
//! completes.

use std::collections::VecDeque;

use log::{debug, info, warn};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_autopilot_core::{
    Cell, Command, Event, FoodPolicy, GridSize, Move, PlanError, PlayState, SearchMethod,
};
use thiserror::Error;

/// Construction parameters for a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    seed: u64,
    food_policy: FoodPolicy,
}

impl Config {
    /// Creates a configuration that seeds food placement with `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            food_policy: FoodPolicy::AvoidSnake,
        }
    }

    /// Selects how new food cells are drawn.
    #[must_use]
    pub const fn with_food_policy(mut self, food_policy: FoodPolicy) -> Self {
        self.food_policy = food_policy;
        self
    }
}

/// Reasons a scripted layout cannot seed a world.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The snake needs at least a head.
    #[error("snake body must contain at least one cell")]
    EmptyBody,
    /// A body cell lies outside the playing field.
    #[error("body cell {cell} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Offending cell.
        cell: Cell,
        /// Number of grid columns.
        columns: u32,
        /// Number of grid rows.
        rows: u32,
    },
    /// Two consecutive body cells are not neighbours.
    #[error("body cells {from} and {to} are not adjacent")]
    Disjoint {
        /// Cell closer to the head.
        from: Cell,
        /// Cell closer to the tail.
        to: Cell,
    },
    /// The body crosses itself.
    #[error("body cell {cell} appears more than once")]
    Overlapping {
        /// Cell listed twice.
        cell: Cell,
    },
    /// The food lies outside the playing field.
    #[error("food cell {cell} lies outside the grid")]
    FoodOutOfBounds {
        /// Offending cell.
        cell: Cell,
    },
}

/// Represents the authoritative snake session.
#[derive(Debug)]
pub struct World {
    grid: GridSize,
    body: Vec<Cell>,
    food: Cell,
    plan: VecDeque<Move>,
    state: PlayState,
    search_method: SearchMethod,
    food_policy: FoodPolicy,
    rng: ChaCha8Rng,
    tick_index: u64,
    awaiting_plan: bool,
}

impl World {
    /// Creates a paused session with a single-segment snake at the start cell.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let grid = GridSize::STANDARD;
        let start = grid.start_cell();
        let mut world = Self::empty(config, grid, vec![start], start);
        world.food = world.draw_food();
        debug!("session created with food at {}", world.food);
        world
    }

    /// Creates a paused session from an explicit body (head first) and food cell.
    pub fn from_layout(config: Config, body: Vec<Cell>, food: Cell) -> Result<Self, LayoutError> {
        let grid = GridSize::STANDARD;
        validate_layout(grid, &body, food)?;
        Ok(Self::empty(config, grid, body, food))
    }

    fn empty(config: Config, grid: GridSize, body: Vec<Cell>, food: Cell) -> Self {
        Self {
            grid,
            body,
            food,
            plan: VecDeque::new(),
            state: PlayState::Paused,
            search_method: SearchMethod::default(),
            food_policy: config.food_policy,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick_index: 0,
            awaiting_plan: false,
        }
    }

    fn head(&self) -> Cell {
        self.body[0]
    }

    fn set_state(&mut self, state: PlayState, out_events: &mut Vec<Event>) {
        if self.state == state {
            return;
        }
        self.state = state;
        out_events.push(Event::PlayStateChanged { state });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.body.clear();
        self.body.push(self.grid.start_cell());
        self.plan.clear();
        self.awaiting_plan = false;
        self.food = self.draw_food();
        self.set_state(PlayState::Paused, out_events);
        info!(
            "session reset: head {} food {} search {}",
            self.head(),
            self.food,
            self.search_method
        );
        out_events.push(Event::GameReset {
            head: self.head(),
            food: self.food,
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.state != PlayState::Running {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::Ticked {
            tick: self.tick_index,
        });

        if self.plan.is_empty() {
            self.awaiting_plan = true;
            out_events.push(Event::PlanRequested {
                head: self.head(),
                food: self.food,
                method: self.search_method,
            });
            return;
        }

        self.advance(out_events);
    }

    fn assign_plan(&mut self, moves: Vec<Move>, out_events: &mut Vec<Event>) {
        if !self.awaiting_plan || self.state != PlayState::Running {
            debug!("discarding unrequested plan of {} moves", moves.len());
            return;
        }
        self.awaiting_plan = false;

        match validate_plan(self.grid, &self.body, self.food, &moves) {
            Ok(()) => {
                self.plan = moves.into();
                out_events.push(Event::PlanAssigned {
                    moves: self.plan.len(),
                });
                self.advance(out_events);
            }
            Err(reason) => {
                warn!("rejected plan: {reason:?}");
                out_events.push(Event::PlanRejected { reason });
            }
        }
    }

    fn trap(&mut self, out_events: &mut Vec<Event>) {
        if !self.awaiting_plan || self.state != PlayState::Running {
            return;
        }
        self.awaiting_plan = false;
        self.plan.clear();

        let head = self.head();
        let food = self.food;
        info!(
            "no route from {head} to {food}; snake trapped at length {}",
            self.body.len()
        );
        self.set_state(PlayState::Trapped, out_events);
        out_events.push(Event::SnakeTrapped { head, food });
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        let Some(step) = self.plan.pop_front() else {
            return;
        };

        let from = self.head();
        let Some(to) = from.step(step, self.grid) else {
            self.plan.clear();
            return;
        };

        self.body.insert(0, to);
        out_events.push(Event::SnakeAdvanced { from, to });

        if to == self.food {
            out_events.push(Event::FoodEaten {
                cell: to,
                length: self.body.len(),
            });
            self.food = self.draw_food();
            debug!("food placed at {}", self.food);
            out_events.push(Event::FoodPlaced { cell: self.food });
            self.plan.clear();
        } else {
            let _ = self.body.pop();
        }
    }

    fn draw_food(&mut self) -> Cell {
        match self.food_policy {
            FoodPolicy::Uniform => self.uniform_cell(),
            FoodPolicy::AvoidSnake => {
                let free: Vec<Cell> = self
                    .grid
                    .cells()
                    .filter(|cell| !self.body.contains(cell))
                    .collect();
                match free.choose(&mut self.rng) {
                    Some(cell) => *cell,
                    None => self.uniform_cell(),
                }
            }
        }
    }

    fn uniform_cell(&mut self) -> Cell {
        let column = self.rng.gen_range(0..self.grid.columns());
        let row = self.rng.gen_range(0..self.grid.rows());
        Cell::new(column, row)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => {
            if world.state == PlayState::Paused {
                world.set_state(PlayState::Running, out_events);
            }
        }
        Command::Pause => {
            if world.state == PlayState::Running {
                world.awaiting_plan = false;
                world.set_state(PlayState::Paused, out_events);
            }
        }
        Command::Reset => world.reset(out_events),
        Command::SelectSearchMethod { method } => {
            world.search_method = method;
            out_events.push(Event::SearchMethodSelected { method });
            world.reset(out_events);
        }
        Command::Tick => world.tick(out_events),
        Command::AssignPlan { moves } => world.assign_plan(moves, out_events),
        Command::ReportNoPath => world.trap(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use snake_autopilot_core::{Cell, FoodPolicy, GridSize, Move, PlayState, SearchMethod};

    /// Dimensions of the playing field.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.grid
    }

    /// Snake body ordered from head to tail.
    #[must_use]
    pub fn body(world: &World) -> &[Cell] {
        &world.body
    }

    /// Cell currently occupied by the head.
    #[must_use]
    pub fn head(world: &World) -> Cell {
        world.head()
    }

    /// Cell currently holding the food.
    #[must_use]
    pub fn food(world: &World) -> Cell {
        world.food
    }

    /// Current lifecycle state of the session.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.state
    }

    /// Search label recorded by the most recent selection.
    #[must_use]
    pub fn search_method(world: &World) -> SearchMethod {
        world.search_method
    }

    /// Placement rule used whenever food respawns.
    #[must_use]
    pub fn food_policy(world: &World) -> FoodPolicy {
        world.food_policy
    }

    /// Moves still queued in the active plan.
    #[must_use]
    pub fn remaining_plan(world: &World) -> Vec<Move> {
        world.plan.iter().copied().collect()
    }

    /// Reports whether a running tick waits for a plan.
    #[must_use]
    pub fn awaiting_plan(world: &World) -> bool {
        world.awaiting_plan
    }

    /// Number of ticks consumed while running.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

fn validate_layout(grid: GridSize, body: &[Cell], food: Cell) -> Result<(), LayoutError> {
    if body.is_empty() {
        return Err(LayoutError::EmptyBody);
    }

    for &cell in body {
        if !grid.contains(cell) {
            return Err(LayoutError::OutOfBounds {
                cell,
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }
    }

    for pair in body.windows(2) {
        if Move::between(pair[0], pair[1]).is_none() {
            return Err(LayoutError::Disjoint {
                from: pair[0],
                to: pair[1],
            });
        }
    }

    let mut seen = vec![false; grid.cell_count()];
    for &cell in body {
        if let Some(index) = grid.index(cell) {
            if seen[index] {
                return Err(LayoutError::Overlapping { cell });
            }
            seen[index] = true;
        }
    }

    if !grid.contains(food) {
        return Err(LayoutError::FoodOutOfBounds { cell: food });
    }

    Ok(())
}

/// Replays `moves` against the body: the tail retracts on every step that
/// does not reach the food, and the head may never enter an occupied cell.
/// Moves after the first arrival at the food are checked for bounds only,
/// since reaching the food discards the rest of the plan.
fn validate_plan(
    grid: GridSize,
    body: &[Cell],
    food: Cell,
    moves: &[Move],
) -> Result<(), PlanError> {
    if moves.is_empty() {
        return Err(PlanError::Empty);
    }

    let mut occupied = vec![false; grid.cell_count()];
    for &cell in body {
        if let Some(index) = grid.index(cell) {
            occupied[index] = true;
        }
    }
    let mut snake: VecDeque<Cell> = body.iter().copied().collect();
    let mut cursor = body[0];
    let mut fed = false;

    for (step, &direction) in moves.iter().enumerate() {
        cursor = cursor
            .step(direction, grid)
            .ok_or(PlanError::LeavesGrid { step })?;
        if fed {
            continue;
        }

        fed = cursor == food;
        if !fed {
            if let Some(index) = snake.pop_back().and_then(|tail| grid.index(tail)) {
                occupied[index] = false;
            }
        }
        if let Some(index) = grid.index(cursor) {
            if occupied[index] {
                return Err(PlanError::CrossesBody { step });
            }
            occupied[index] = true;
        }
        snake.push_front(cursor);
    }

    if cursor != food {
        return Err(PlanError::MissesFood);
    }

    Ok(())
}
