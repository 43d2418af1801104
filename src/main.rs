mod config;
mod error;
mod game;
mod highscore;
mod input;
mod session;
mod snake;
mod state;
mod term;

use std::process::exit;

use log::error;

use crate::config::GameConfig;
use crate::error::SnakeError;
use crate::game::{Flow, SnakeGame};

pub type TermInt = u16;
pub type Coords = (u16, u16);

pub type GridInt = u16;
/// A board position as (row, col).
pub type Cell = (GridInt, GridInt);

fn main() {
    // Logs go to stderr; redirect it (`2>snake.log`) to keep the board clean.
    env_logger::init();

    let mut game = match SnakeGame::new(GameConfig::default()) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("snake: {}", e);
            exit(1);
        }
    };

    let res = run(&mut game);

    // Always hand the terminal back, even after an error
    if let Err(e) = game.restore() {
        error!("could not restore the terminal: {}", e);
    }

    if let Err(e) = res {
        eprintln!("snake: {}", e);
        exit(1);
    }
}

fn run(game: &mut SnakeGame) -> Result<(), SnakeError> {
    game.initialize()?;

    if game.show_intro()? == Flow::Quit {
        return Ok(());
    }

    while game.play()? == Flow::Continue {}
    Ok(())
}
