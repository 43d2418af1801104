use crate::Cell;
use crate::config::Grid;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step as (dRow, dCol).
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    pub fn head_char(&self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// The head advanced and the old tail cell was vacated.
    Moved { new_head: Cell, old_tail: Cell },
    /// The head landed on the food; the tail stays and the snake is one cell longer.
    Grew { new_head: Cell },
    Crashed
}

/// The snake's body, tail first and head last.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
}

impl Snake {
    /// Builds a straight snake of `size` cells whose tail sits at `tail`,
    /// laid out along `direction` so that it is already heading that way.
    pub fn new(tail: Cell, size: u16, direction: Direction, grid: Grid) -> Self {
        let mut body = Vec::with_capacity(size as usize);
        let mut cell = tail;

        for _ in 0..size.max(1) {
            body.push(cell);
            cell = grid.step(cell, direction);
        }

        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_cells(body: Vec<Cell>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one cell");
        Snake { body, direction }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    /// Moves one cell forward, wrapping around the grid edges.
    ///
    /// The new head is checked against every current body cell, the tail
    /// included, before anything is popped. Landing on the square the tail
    /// is about to leave is still a crash.
    pub fn move_step(&mut self, grid: Grid, food: Option<Cell>) -> MoveResult {
        let new_head = grid.step(self.head(), self.direction);

        if self.contains(&new_head) {
            return Crashed;
        }

        self.body.push(new_head);

        if food == Some(new_head) {
            Grew { new_head }
        } else {
            let old_tail = self.body.remove(0);
            Moved { new_head, old_tail }
        }
    }

    /// Applies an absolute direction change. A request for the exact reverse
    /// of the current heading is ignored; returns whether the change took.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.direction) {
            false
        } else {
            self.direction = new_direction;
            true
        }
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        self.direction.head_char()
    }
}
