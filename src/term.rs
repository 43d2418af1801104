use crate::{Cell, Coords, TermInt};
use crate::config::Grid;
use crate::highscore::HighscoreRecord;
use crate::snake::Snake;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHARS: [char; 2] = ['(', ')'];
const DEAD_SNAKE_CHAR: char = 'X';

/// Terminal columns per grid cell; keeps cells roughly square.
const CELL_WIDTH: TermInt = 2;

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

/// What the board shows this frame.
pub struct Frame<'a> {
    pub snake: &'a Snake,
    pub food: Option<Cell>,
    pub score: u32,
    pub highscore: &'a HighscoreRecord,
    pub dead: bool,
}

impl TermManager {
    pub fn new() -> crossterm::Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None, active: false })
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> crossterm::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Drains every pending key press without waiting.
    pub fn read_key_events_queue(&self) -> crossterm::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Terminal size needed to draw `grid` with its border and status line.
    pub fn required_size(grid: Grid) -> Coords {
        (grid.cols * CELL_WIDTH + 2, grid.rows + 3)
    }

    pub fn draw_borders(&mut self, grid: Grid) -> crossterm::Result<()> {
        let (width, height) = TermManager::required_size(grid);
        let (ox, oy) = self.board_origin(grid);
        let top = oy + 1;
        let bottom = oy + height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((ox + x, top), ch)?;
            self.print_at((ox + x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((ox, y), '|')?;
            self.print_at((ox + width - 1, y), '|')?;
        }

        self.flush()
    }

    /// Draws the whole board. Only cells that differ from what is already on
    /// screen are written out.
    pub fn draw_board(&mut self, grid: Grid, frame: &Frame) -> crossterm::Result<()> {
        let mut cells = vec![[' ', ' ']; grid.len()];
        let index = |(r, c): Cell| r as usize * grid.cols as usize + c as usize;

        if let Some(food) = frame.food {
            cells[index(food)] = FOOD_CHARS;
        }

        let body = frame.snake.body();
        for (i, &pos) in body.iter().enumerate() {
            let ch = if frame.dead {
                DEAD_SNAKE_CHAR
            } else if i == body.len() - 1 {
                frame.snake.head_char()
            } else {
                SNAKE_BODY_CHAR
            };
            cells[index(pos)] = [ch, ch];
        }

        for cell in grid.cells() {
            let [left, right] = cells[index(cell)];
            let pos = self.cell_origin(grid, cell);
            self.print_at(pos, left)?;
            self.print_at((pos.0 + 1, pos.1), right)?;
        }

        let status = format!(
            "Score: {}   Best: {} {}",
            frame.score, frame.highscore.name, frame.highscore.score
        );
        let (ox, oy) = self.board_origin(grid);
        let width = TermManager::required_size(grid).0 as usize;
        self.print_str_at((ox, oy), &format!("{:<width$}", status, width = width))?;

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> crossterm::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(ch) = self.screen_char(pos) {
                    self.print_at_no_save(pos, ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn clear(&mut self) -> crossterm::Result<()> {
        self.current_msg = None;
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Top-left of the status line; the bordered board sits right below it.
    fn board_origin(&self, grid: Grid) -> Coords {
        let (w, h) = TermManager::required_size(grid);
        (self.width.saturating_sub(w) / 2, self.height.saturating_sub(h) / 2)
    }

    fn cell_origin(&self, grid: Grid, (row, col): Cell) -> Coords {
        let (ox, oy) = self.board_origin(grid);
        (ox + 1 + col * CELL_WIDTH, oy + 2 + row)
    }

    fn screen_index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn screen_char(&self, pos: Coords) -> Option<char> {
        self.screen_index(pos).map(|i| self.screen[i])
    }

    /// Queues `ch` at `pos` unless it is already there.
    fn print_at(&mut self, pos: Coords, ch: char) -> crossterm::Result<()> {
        let i = match self.screen_index(pos) {
            Some(i) => i,
            None => return Ok(()),
        };

        if self.screen[i] != ch {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
            self.screen[i] = ch;
        }
        Ok(())
    }

    fn print_str_at(&mut self, pos: Coords, s: &str) -> crossterm::Result<()> {
        for (x_diff, ch) in s.chars().enumerate() {
            self.print_at((pos.0 + x_diff as TermInt, pos.1), ch)?;
        }
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> crossterm::Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        if self.screen_index(pos).is_some() {
            queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        }
        Ok(())
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}
