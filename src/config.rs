use std::path::PathBuf;
use std::time::Duration;

use crate::{Cell, GridInt};
use crate::snake::Direction;

/// Logical window size, in pixels, that the grid is derived from.
pub const WINDOW_W: GridInt = 640;
pub const WINDOW_H: GridInt = 480;
pub const CELL_SIZE: GridInt = 20;

const PLAY_TICKS_PER_SEC: u64 = 15;
const NAME_ENTRY_POLLS_PER_SEC: u64 = 30;

pub const INITIAL_SNAKE_LENGTH: u16 = 3;
pub const INITIAL_DIRECTION: Direction = Direction::Right;

pub const HIGHSCORE_FILE: &str = "highscore.json";
pub const DEFAULT_PLAYER_NAME: &str = "Player";
pub const MAX_NAME_LEN: usize = 16;

/// Dimensions of the toroidal board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub rows: GridInt,
    pub cols: GridInt,
}

impl Grid {
    pub fn new(rows: GridInt, cols: GridInt) -> Self {
        assert!(rows > 0 && cols > 0, "grid must have at least one cell");
        Grid { rows, cols }
    }

    pub fn from_window(width: GridInt, height: GridInt, cell_size: GridInt) -> Self {
        Grid::new(height / cell_size, width / cell_size)
    }

    pub fn len(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// The neighbour of `cell` in `direction`, wrapping at every edge.
    pub fn step(&self, cell: Cell, direction: Direction) -> Cell {
        let (d_row, d_col) = direction.delta();
        (wrap(cell.0, d_row, self.rows), wrap(cell.1, d_col, self.cols))
    }

    /// Every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c)))
    }
}

fn wrap(value: GridInt, delta: i8, size: GridInt) -> GridInt {
    let size = i32::from(size);
    (i32::from(value) + i32::from(delta)).rem_euclid(size) as GridInt
}

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid: Grid,
    pub play_tick: Duration,
    pub name_entry_tick: Duration,
    pub initial_length: u16,
    pub initial_direction: Direction,
    pub highscore_path: PathBuf,
    pub max_name_len: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: Grid::from_window(WINDOW_W, WINDOW_H, CELL_SIZE),
            play_tick: Duration::from_millis(1000 / PLAY_TICKS_PER_SEC),
            name_entry_tick: Duration::from_millis(1000 / NAME_ENTRY_POLLS_PER_SEC),
            initial_length: INITIAL_SNAKE_LENGTH,
            initial_direction: INITIAL_DIRECTION,
            highscore_path: default_highscore_path(),
            max_name_len: Some(MAX_NAME_LEN),
        }
    }
}

impl GameConfig {
    /// Where the initial snake's tail goes: mid-height, just left of centre,
    /// so a three cell snake ends up straddling the middle column.
    pub fn initial_tail(&self) -> Cell {
        (self.grid.rows / 2, (self.grid.cols / 2).saturating_sub(1))
    }
}

/// The highscore file lives next to the executable. Falls back to the
/// working directory if the executable path can't be resolved.
fn default_highscore_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(HIGHSCORE_FILE)))
        .unwrap_or_else(|| PathBuf::from(HIGHSCORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn default_grid_is_32_by_24() {
        let config = GameConfig::default();
        assert_eq!(config.grid, Grid { rows: 24, cols: 32 });
        assert_eq!(config.initial_tail(), (12, 15));
        assert_eq!(config.play_tick, Duration::from_millis(66));
    }

    #[test]
    fn steps_wrap_around_every_edge() {
        let grid = Grid::new(24, 32);
        assert_eq!(grid.step((12, 31), Right), (12, 0));
        assert_eq!(grid.step((12, 0), Left), (12, 31));
        assert_eq!(grid.step((0, 7), Up), (23, 7));
        assert_eq!(grid.step((23, 7), Down), (0, 7));
        assert_eq!(grid.step((4, 4), Down), (5, 4));
    }

    #[test]
    fn cells_cover_the_grid_once() {
        let grid = Grid::new(3, 4);
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), grid.len());
        assert_eq!(cells[0], (0, 0));
        assert_eq!(cells[11], (2, 3));
    }
}
