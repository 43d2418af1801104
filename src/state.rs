use log::debug;
use rand::{Rng, rngs::ThreadRng, seq::SliceRandom};

use crate::Cell;
use crate::config::{GameConfig, Grid};
use crate::snake::{Direction, Snake, MoveResult::*};

/// Random picks tried before falling back to scanning the board for free cells.
const MAX_SPAWN_ATTEMPTS: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    Continue,
    GameOver
}

/// The simulation: one snake, at most one piece of food and the score.
/// Nothing in here touches the terminal; the only side effect is the RNG.
pub struct GameState<R = ThreadRng> {
    grid: Grid,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    over: bool,
    rng: R,
}

impl GameState<ThreadRng> {
    pub fn new(config: &GameConfig) -> Self {
        GameState::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(config: &GameConfig, rng: R) -> Self {
        let snake = Snake::new(
            config.initial_tail(),
            config.initial_length,
            config.initial_direction,
            config.grid,
        );
        GameState::from_parts(config.grid, snake, None, rng)
    }

    /// Starts from an arbitrary snake. Food is spawned when none is given.
    pub fn from_parts(grid: Grid, snake: Snake, food: Option<Cell>, rng: R) -> Self {
        let mut state = GameState { grid, snake, food, score: 0, over: false, rng };
        if state.food.is_none() {
            state.spawn_food();
        }
        state
    }

    /// Runs one tick. `input` is the latest direction key since the previous
    /// tick; the reverse of the current heading is dropped silently.
    ///
    /// Once this has returned `GameOver` it keeps doing so without touching
    /// the state.
    pub fn advance(&mut self, input: Option<Direction>) -> TickResult {
        if self.over {
            return TickResult::GameOver;
        }

        if let Some(dir) = input {
            self.snake.set_direction(dir);
        }

        match self.snake.move_step(self.grid, self.food) {
            Crashed => {
                self.over = true;
                TickResult::GameOver
            },
            Grew { new_head } => {
                self.score += 1;
                debug!("ate food at {:?}, score {}", new_head, self.score);
                self.spawn_food();
                TickResult::Continue
            },
            Moved { .. } => TickResult::Continue,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    ///////////////////////////////////////////////////////////////////////////

    fn spawn_food(&mut self) {
        self.food = self.pick_free_cell();

        match self.food {
            Some(cell) => debug!("spawned food at {:?}", cell),
            None => debug!("board is full, no food spawned"),
        }
    }

    /// Uniform over the cells not covered by the snake. Rejection sampling
    /// first; after `MAX_SPAWN_ATTEMPTS` misses the free cells are listed and
    /// one is chosen directly, so a crowded board still terminates.
    fn pick_free_cell(&mut self) -> Option<Cell> {
        let grid = self.grid;

        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let cell = (self.rng.gen_range(0..grid.rows), self.rng.gen_range(0..grid.cols));
            if !self.snake.contains(&cell) {
                return Some(cell);
            }
        }

        let snake = &self.snake;
        let free: Vec<Cell> = grid.cells().filter(|cell| !snake.contains(cell)).collect();
        free.choose(&mut self.rng).copied()
    }
}
